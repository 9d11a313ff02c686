use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{
    DocumentExtractor, TextSplitter, document_extractor::DocumentExtractionError,
};
use crate::domain::entities::ProcessedDocument;
use crate::domain::value_objects::DocumentType;

#[derive(Debug, Error)]
pub enum DocumentProcessingError {
    #[error("Unsupported document type: {0}")]
    UnsupportedDocumentType(DocumentType),
    #[error("{label} processing failed: {source}")]
    ExtractionFailed {
        label: &'static str,
        #[source]
        source: DocumentExtractionError,
    },
    #[error("Failed to read document: {0}")]
    IoError(#[from] std::io::Error),
}

/// Turns a stored upload into text chunks: detect type, extract, split.
pub struct DocumentProcessorService {
    document_extractor: Arc<dyn DocumentExtractor>,
    text_splitter: Arc<dyn TextSplitter>,
}

impl DocumentProcessorService {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        text_splitter: Arc<dyn TextSplitter>,
    ) -> Self {
        Self {
            document_extractor,
            text_splitter,
        }
    }

    pub async fn detect_document_type(
        &self,
        file_path: &Path,
    ) -> Result<DocumentType, DocumentProcessingError> {
        let content = tokio::fs::read(file_path).await?;
        Ok(DocumentType::detect(&content))
    }

    pub async fn process_document(
        &self,
        file_path: &Path,
        filename: &str,
    ) -> Result<ProcessedDocument, DocumentProcessingError> {
        let file_type = self.detect_document_type(file_path).await?;
        tracing::debug!("Detected {} as {}", filename, file_type);

        if !self.document_extractor.can_extract(file_type) {
            return Err(DocumentProcessingError::UnsupportedDocumentType(file_type));
        }

        let extracted = self
            .document_extractor
            .extract_text(file_path, file_type)
            .await
            .map_err(|source| match source {
                DocumentExtractionError::UnsupportedFormat(_) => {
                    DocumentProcessingError::UnsupportedDocumentType(file_type)
                }
                source => DocumentProcessingError::ExtractionFailed {
                    label: processing_label(file_type),
                    source,
                },
            })?;

        let chunks = self.text_splitter.split_text(&extracted.text);

        tracing::info!(
            "Processed {} ({}): {} characters, {} chunks",
            filename,
            file_type,
            extracted.text.chars().count(),
            chunks.len()
        );

        Ok(ProcessedDocument {
            filename: filename.to_string(),
            file_type,
            text: extracted.text,
            chunks,
            page_count: extracted.page_count,
            image_format: extracted.image_format,
            image_mode: extracted.image_mode,
        })
    }
}

fn processing_label(file_type: DocumentType) -> &'static str {
    match file_type {
        DocumentType::Pdf => "PDF",
        DocumentType::Image => "Image",
        DocumentType::Text => "Text",
        DocumentType::Excel => "Excel",
    }
}
