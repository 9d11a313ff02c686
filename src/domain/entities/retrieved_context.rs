use serde::{Deserialize, Serialize};

use crate::domain::entities::content_chunk::ChunkMetadata;

/// A chunk returned by similarity search, as sent back alongside answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub text: String,
    pub distance: f32,
    pub metadata: ChunkMetadata,
}
