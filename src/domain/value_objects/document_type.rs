use serde::{Deserialize, Serialize};

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Kind of document, decided from file content rather than the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Image,
    Text,
    Excel,
}

impl DocumentType {
    /// Sniffs the leading bytes. Anything unrecognised is treated as text.
    pub fn detect(content: &[u8]) -> Self {
        if content.starts_with(PDF_MAGIC) {
            DocumentType::Pdf
        } else if content.starts_with(PNG_MAGIC) || content.starts_with(JPEG_MAGIC) {
            DocumentType::Image
        } else if content.starts_with(ZIP_MAGIC) && content.windows(3).any(|w| w == b"xl/") {
            DocumentType::Excel
        } else {
            DocumentType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Image => "image",
            DocumentType::Text => "text",
            DocumentType::Excel => "excel",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "application/pdf",
            DocumentType::Image => "image/*",
            DocumentType::Text => "text/plain",
            DocumentType::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(DocumentType::Pdf),
            "image" => Ok(DocumentType::Image),
            "text" => Ok(DocumentType::Text),
            "excel" => Ok(DocumentType::Excel),
            other => Err(format!("Invalid document type: {}", other)),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf() {
        assert_eq!(DocumentType::detect(b"%PDF-1.7\n..."), DocumentType::Pdf);
    }

    #[test]
    fn test_detect_images() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

        assert_eq!(DocumentType::detect(&png), DocumentType::Image);
        assert_eq!(DocumentType::detect(&jpeg), DocumentType::Image);
    }

    #[test]
    fn test_detect_excel() {
        let mut xlsx = b"PK\x03\x04".to_vec();
        xlsx.extend_from_slice(b"\x14\x00\x06\x00[Content_Types].xml....xl/workbook.xml");
        assert_eq!(DocumentType::detect(&xlsx), DocumentType::Excel);

        let plain_zip = b"PK\x03\x04\x14\x00word/document.xml";
        assert_eq!(DocumentType::detect(plain_zip), DocumentType::Text);
    }

    #[test]
    fn test_unknown_defaults_to_text() {
        assert_eq!(DocumentType::detect(b"hello there"), DocumentType::Text);
        assert_eq!(DocumentType::detect(b""), DocumentType::Text);
    }

    #[test]
    fn test_string_conversion() {
        for kind in [
            DocumentType::Pdf,
            DocumentType::Image,
            DocumentType::Text,
            DocumentType::Excel,
        ] {
            assert_eq!(DocumentType::from_string(kind.as_str()).unwrap(), kind);
        }
        assert!(DocumentType::from_string("docx").is_err());
    }
}
