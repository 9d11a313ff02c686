pub mod recursive_splitter;

pub use recursive_splitter::RecursiveCharacterSplitter;
