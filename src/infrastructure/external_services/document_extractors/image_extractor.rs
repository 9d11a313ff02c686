use async_trait::async_trait;
use image::{ColorType, ImageFormat};
use std::path::{Path, PathBuf};

use super::ocr;
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};
use crate::domain::value_objects::DocumentType;

/// OCR for PNG/JPEG uploads. Format and colour mode are reported alongside the text.
#[derive(Default)]
pub struct ImageExtractor;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub format: String,
    pub mode: String,
}

impl ImageExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Decodes the image to validate it and read its format and colour mode.
    pub fn inspect(path: &Path) -> Result<ImageInfo, DocumentExtractionError> {
        let reader = image::io::Reader::open(path)?
            .with_guessed_format()
            .map_err(DocumentExtractionError::IoError)?;

        let format = reader.format();
        let decoded = reader
            .decode()
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        Ok(ImageInfo {
            format: format.map(format_name).unwrap_or_else(|| "UNKNOWN".to_string()),
            mode: color_mode(decoded.color()),
        })
    }
}

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

fn color_mode(color: ColorType) -> String {
    match color {
        ColorType::L8 | ColorType::L16 => "L".to_string(),
        ColorType::La8 | ColorType::La16 => "LA".to_string(),
        ColorType::Rgb8 | ColorType::Rgb16 => "RGB".to_string(),
        ColorType::Rgba8 | ColorType::Rgba16 => "RGBA".to_string(),
        other => format!("{:?}", other),
    }
}

#[async_trait]
impl DocumentExtractor for ImageExtractor {
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
        let info = tokio::task::spawn_blocking(move || Self::inspect(&path))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))??;

        if !ocr::has_tesseract().await {
            return Err(DocumentExtractionError::OcrUnavailable(
                "tesseract is not installed".to_string(),
            ));
        }

        let text = ocr::ocr_image(file_path).await?;

        Ok(ExtractedContent {
            text,
            page_count: None,
            image_format: Some(info.format),
            image_mode: Some(info.mode),
        })
    }

    fn can_extract(&self, document_type: DocumentType) -> bool {
        document_type == DocumentType::Image
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        vec![DocumentType::Image]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_inspect_png_and_jpeg() {
        let dir = tempfile::tempdir().unwrap();

        let png = dir.path().join("gray.png");
        GrayImage::from_pixel(4, 4, Luma([200])).save(&png).unwrap();
        assert_eq!(
            ImageExtractor::inspect(&png).unwrap(),
            ImageInfo {
                format: "PNG".to_string(),
                mode: "L".to_string()
            }
        );

        // no extension: format comes from the magic bytes
        let jpeg = dir.path().join("photo");
        RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]))
            .save_with_format(&jpeg, ImageFormat::Jpeg)
            .unwrap();
        assert_eq!(
            ImageExtractor::inspect(&jpeg).unwrap(),
            ImageInfo {
                format: "JPEG".to_string(),
                mode: "RGB".to_string()
            }
        );
    }

    #[test]
    fn test_undecodable_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        assert!(matches!(
            ImageExtractor::inspect(&path),
            Err(DocumentExtractionError::CorruptedFile(_))
        ));
    }

    #[tokio::test]
    async fn test_broken_image_fails_before_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"\xff\xd8\xff\xe0garbage").unwrap();

        let result = ImageExtractor::new()
            .extract_text(&path, DocumentType::Image)
            .await;
        assert!(matches!(result, Err(DocumentExtractionError::CorruptedFile(_))));
    }
}
