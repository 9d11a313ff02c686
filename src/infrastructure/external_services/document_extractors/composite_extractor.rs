use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::{ImageExtractor, PdfExtractor, TextExtractor};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};
use crate::domain::value_objects::DocumentType;

/// Routes each document type to its extractor. Spreadsheets have none.
pub struct CompositeDocumentExtractor {
    pdf_extractor: Arc<PdfExtractor>,
    image_extractor: Arc<ImageExtractor>,
    text_extractor: Arc<TextExtractor>,
}

impl CompositeDocumentExtractor {
    pub fn new() -> Self {
        Self {
            pdf_extractor: Arc::new(PdfExtractor::new()),
            image_extractor: Arc::new(ImageExtractor::new()),
            text_extractor: Arc::new(TextExtractor::new()),
        }
    }

    fn get_extractor_for_type(
        &self,
        document_type: DocumentType,
    ) -> Option<Arc<dyn DocumentExtractor>> {
        if self.pdf_extractor.can_extract(document_type) {
            Some(self.pdf_extractor.clone())
        } else if self.image_extractor.can_extract(document_type) {
            Some(self.image_extractor.clone())
        } else if self.text_extractor.can_extract(document_type) {
            Some(self.text_extractor.clone())
        } else {
            None
        }
    }
}

impl Default for CompositeDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for CompositeDocumentExtractor {
    async fn extract_text(
        &self,
        file_path: &Path,
        document_type: DocumentType,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        let extractor = self.get_extractor_for_type(document_type).ok_or_else(|| {
            DocumentExtractionError::UnsupportedFormat(document_type.to_string())
        })?;

        extractor.extract_text(file_path, document_type).await
    }

    fn can_extract(&self, document_type: DocumentType) -> bool {
        self.get_extractor_for_type(document_type).is_some()
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        let mut types = Vec::new();
        types.extend(self.pdf_extractor.supported_types());
        types.extend(self.image_extractor.supported_types());
        types.extend(self.text_extractor.supported_types());
        types
    }
}
