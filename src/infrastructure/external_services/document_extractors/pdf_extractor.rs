use async_trait::async_trait;
use lopdf::Document;
use lopdf::Object;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::path::{Path, PathBuf};

use super::ocr;
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};
use crate::domain::value_objects::DocumentType;

/// Text layer extraction with lopdf, falling back to OCR for scanned PDFs.
pub struct PdfExtractor {
    password: String,
    ocr_fallback: bool,
}

struct PdfText {
    pages: Vec<String>,
    page_count: usize,
    errors: Vec<String>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
            ocr_fallback: true,
        }
    }

    pub fn without_ocr(mut self) -> Self {
        self.ocr_fallback = false;
        self
    }

    fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
        static IGNORE: &[&[u8]] = &[
            b"Length",
            b"BBox",
            b"Matrix",
            b"Filter",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"FontDescriptor",
            b"ExtGState",
            b"MediaBox",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<_> = dict
                .iter()
                .filter(|(key, _)| IGNORE.contains(&key.as_slice()))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    fn load_text(path: &Path, password: &str) -> Result<PdfText, DocumentExtractionError> {
        let mut doc = Document::load_filtered(path, Self::filter_func)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(password).map_err(|_e| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let pages = doc.get_pages();
        let page_count = pages.len();

        let extracted: Vec<Result<(u32, String), String>> = pages
            .into_par_iter()
            .map(|(page_num, _)| {
                doc.extract_text(&[page_num])
                    .map(|text| (page_num, text))
                    .map_err(|e| format!("Failed to extract text from page {}: {}", page_num, e))
            })
            .collect();

        let mut page_texts = Vec::new();
        let mut errors = Vec::new();
        for result in extracted {
            match result {
                Ok((_, text)) => page_texts.push(text),
                Err(e) => errors.push(e),
            }
        }

        Ok(PdfText {
            pages: page_texts,
            page_count,
            errors,
        })
    }

    async fn ocr_pages(&self, path: &Path) -> Result<String, DocumentExtractionError> {
        let scratch = tempfile::tempdir()?;
        let images = ocr::rasterize_pdf(path, scratch.path()).await?;

        let mut texts = Vec::with_capacity(images.len());
        for image in &images {
            texts.push(ocr::ocr_image(image).await?);
        }

        Ok(texts.join("\n"))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
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

        let path: PathBuf = file_path.to_path_buf();
        let password = self.password.clone();
        let pdf = tokio::task::spawn_blocking(move || Self::load_text(&path, &password))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))??;

        for error in &pdf.errors {
            tracing::warn!("{}: {}", file_path.display(), error);
        }

        let mut text = pdf.pages.join("\n");

        if text.trim().is_empty() && self.ocr_fallback {
            if ocr::has_pdftoppm().await && ocr::has_tesseract().await {
                tracing::info!(
                    "No text layer in {}, running OCR on {} pages",
                    file_path.display(),
                    pdf.page_count
                );
                text = self.ocr_pages(file_path).await?;
            } else {
                tracing::warn!(
                    "No text layer in {} and OCR tools are not installed",
                    file_path.display()
                );
            }
        }

        Ok(ExtractedContent {
            text,
            page_count: Some(pdf.page_count),
            ..ExtractedContent::default()
        })
    }

    fn can_extract(&self, document_type: DocumentType) -> bool {
        document_type == DocumentType::Pdf
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        vec![DocumentType::Pdf]
    }
}
