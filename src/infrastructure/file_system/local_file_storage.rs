use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::file_storage::{FileStorage, FileStorageError, StoredFile};

/// Flat directory of files on the local filesystem (or a mounted volume).
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    fn get_file_path(&self, file_name: &str) -> Result<PathBuf, FileStorageError> {
        let is_plain_name = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);

        if !is_plain_name {
            return Err(FileStorageError::InvalidPath(file_name.to_string()));
        }

        Ok(self.base_path.join(file_name))
    }

    fn ensure_inside(&self, path: &Path) -> Result<(), FileStorageError> {
        if path.parent() == Some(self.base_path.as_path()) {
            Ok(())
        } else {
            Err(FileStorageError::InvalidPath(path.display().to_string()))
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(
        &self,
        data: &[u8],
        file_name: &str,
    ) -> Result<StoredFile, FileStorageError> {
        self.ensure_directory_exists().await?;

        let file_path = self.get_file_path(file_name)?;

        fs::write(&file_path, data)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?;

        Ok(StoredFile {
            name: file_name.to_string(),
            path: file_path,
            size: data.len() as u64,
        })
    }

    async fn retrieve_file(&self, path: &Path) -> Result<Vec<u8>, FileStorageError> {
        self.ensure_inside(path)?;

        match fs::read(path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileStorageError::FileNotFound(path.display().to_string()))
            }
            Err(e) => Err(FileStorageError::IoError(e.to_string())),
        }
    }

    async fn delete_file(&self, path: &Path) -> Result<bool, FileStorageError> {
        self.ensure_inside(path)?;

        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStorageError::IoError(e.to_string())),
        }
    }

    async fn file_exists(&self, file_name: &str) -> Result<bool, FileStorageError> {
        let file_path = self.get_file_path(file_name)?;
        fs::try_exists(&file_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_retrieve_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("documents"));

        let stored = storage.store_file(b"hello", "greeting.txt").await.unwrap();
        assert_eq!(stored.size, 5);
        assert!(storage.file_exists("greeting.txt").await.unwrap());
        assert_eq!(storage.retrieve_file(&stored.path).await.unwrap(), b"hello");

        assert!(storage.delete_file(&stored.path).await.unwrap());
        assert!(!storage.delete_file(&stored.path).await.unwrap());
        assert!(!storage.file_exists("greeting.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        assert!(matches!(
            storage.store_file(b"x", "../escape.txt").await,
            Err(FileStorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.delete_file(Path::new("/etc/hosts")).await,
            Err(FileStorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        assert!(matches!(
            storage.retrieve_file(&dir.path().join("nope.txt")).await,
            Err(FileStorageError::FileNotFound(_))
        ));
    }
}
