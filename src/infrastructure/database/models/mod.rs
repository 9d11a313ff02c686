pub mod document_embedding_model;

pub use document_embedding_model::*;
