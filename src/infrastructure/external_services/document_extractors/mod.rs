pub mod composite_extractor;
pub mod image_extractor;
pub mod ocr;
pub mod pdf_extractor;
pub mod text_extractor;

pub use composite_extractor::CompositeDocumentExtractor;
pub use image_extractor::ImageExtractor;
pub use pdf_extractor::PdfExtractor;
pub use text_extractor::TextExtractor;
