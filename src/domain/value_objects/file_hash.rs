use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHash(String);

impl FileHash {
    pub fn new(hash: String) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err("Hash must be 64 characters long (SHA-256)".to_string());
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Hash must contain only hexadecimal characters".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an uploaded document: `{filename}_{sha256}`.
///
/// The same bytes uploaded under the same name always map to the same id,
/// which is what makes re-uploads idempotent in the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(filename: &str, hash: &FileHash) -> Self {
        Self(format!("{}_{}", filename, hash.as_str()))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let (filename, hash) = value
            .rsplit_once('_')
            .ok_or_else(|| format!("Invalid document id: {}", value))?;

        if filename.is_empty() {
            return Err(format!("Invalid document id: {}", value));
        }

        FileHash::new(hash.to_string())?;
        Ok(Self(value.to_string()))
    }

    pub fn chunk_id(&self, index: usize) -> String {
        format!("{}_chunk_{}", self.0, index)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hash() {
        let hash_str = "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
        let hash = FileHash::new(hash_str.to_string()).unwrap();
        assert_eq!(hash.as_str(), hash_str);
    }

    #[test]
    fn test_invalid_hash() {
        assert!(FileHash::new("invalid".to_string()).is_err());
        assert!(
            FileHash::new(
                "g665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3".to_string()
            )
            .is_err()
        );
    }

    #[test]
    fn test_from_bytes_is_sha256() {
        let hash = FileHash::from_bytes(b"hello world");
        assert_eq!(
            hash.as_str(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_document_id_is_stable() {
        let first = DocumentId::new("report.pdf", &FileHash::from_bytes(b"same bytes"));
        let second = DocumentId::new("report.pdf", &FileHash::from_bytes(b"same bytes"));
        let renamed = DocumentId::new("other.pdf", &FileHash::from_bytes(b"same bytes"));

        assert_eq!(first, second);
        assert_ne!(first, renamed);
        assert!(first.as_str().starts_with("report.pdf_"));
    }

    #[test]
    fn test_chunk_ids() {
        let id = DocumentId::new("notes.txt", &FileHash::from_bytes(b"x"));
        assert_eq!(id.chunk_id(3), format!("{}_chunk_3", id));
    }

    #[test]
    fn test_parse_document_id() {
        let id = DocumentId::new("my_file.txt", &FileHash::from_bytes(b"x"));
        let parsed = DocumentId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);

        assert!(DocumentId::parse("no-hash-here").is_err());
        assert!(DocumentId::parse("file_abc").is_err());
    }
}
