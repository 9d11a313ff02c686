use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::value_objects::DocumentType;

#[derive(Debug, Error)]
pub enum DocumentExtractionError {
    #[error("Unsupported document type: {0}")]
    UnsupportedFormat(String),
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    pub text: String,
    pub page_count: Option<usize>,
    pub image_format: Option<String>,
    pub image_mode: Option<String>,
}

impl ExtractedContent {
    pub fn from_text(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(
        &self,
        file_path: &Path,
        document_type: DocumentType,
    ) -> Result<ExtractedContent, DocumentExtractionError>;

    fn can_extract(&self, document_type: DocumentType) -> bool;

    fn supported_types(&self) -> Vec<DocumentType>;
}
