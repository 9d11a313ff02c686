use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};
use crate::domain::value_objects::DocumentType;

/// Plain text files, which must be valid UTF-8.
#[derive(Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for TextExtractor {
    async fn extract_text(
        &self,
        file_path: &Path,
        document_type: DocumentType,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        if !self.can_extract(document_type) {
            return Err(DocumentExtractionError::UnsupportedFormat(
                document_type.to_string(),
            ));
        }

        let bytes = tokio::fs::read(file_path).await?;
        let text = String::from_utf8(bytes).map_err(|e| {
            DocumentExtractionError::CorruptedFile(format!("invalid UTF-8: {}", e.utf8_error()))
        })?;

        Ok(ExtractedContent::from_text(text))
    }

    fn can_extract(&self, document_type: DocumentType) -> bool {
        document_type == DocumentType::Text
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        vec![DocumentType::Text]
    }
}
