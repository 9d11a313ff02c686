use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("IO error: {0}")]
    IoError(String),
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Writes `data` as `file_name` directly under the storage root.
    async fn store_file(&self, data: &[u8], file_name: &str)
    -> Result<StoredFile, FileStorageError>;

    async fn retrieve_file(&self, path: &Path) -> Result<Vec<u8>, FileStorageError>;

    /// Returns false when there was nothing to delete.
    async fn delete_file(&self, path: &Path) -> Result<bool, FileStorageError>;

    async fn file_exists(&self, file_name: &str) -> Result<bool, FileStorageError>;

    fn base_path(&self) -> &Path;
}
