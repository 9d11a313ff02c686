/// Splits extracted text into chunks sized for embedding.
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;

    fn chunk_size(&self) -> usize;

    fn chunk_overlap(&self) -> usize;
}
