use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DocumentType;

/// Output of text extraction and splitting for one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub filename: String,
    pub file_type: DocumentType,
    pub text: String,
    pub chunks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_mode: Option<String>,
}

impl ProcessedDocument {
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn has_chunks(&self) -> bool {
        !self.chunks.is_empty()
    }
}
