pub mod container;
pub mod database;
pub mod external_services;
pub mod file_system;
pub mod memory;
pub mod messaging;
pub mod text_processing;
pub mod vector_store;

// Re-export commonly used items
pub use container::AppContainer;
pub use external_services::{GeminiClient, InferenceEmbeddingProvider};
pub use file_system::LocalFileStorage;
pub use vector_store::LocalVectorRepository;
