use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DocumentId, DocumentType};

/// Metadata stored next to every chunk and echoed back with search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub filename: String,
    pub file_type: DocumentType,
    pub chunk_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    id: String,
    document_id: String,
    chunk_text: String,
    metadata: ChunkMetadata,
    created_at: DateTime<Utc>,
}

impl ContentChunk {
    pub fn new(
        document_id: &DocumentId,
        chunk_index: usize,
        chunk_text: String,
        filename: &str,
        file_type: DocumentType,
    ) -> Self {
        Self {
            id: document_id.chunk_id(chunk_index),
            document_id: document_id.to_string(),
            chunk_text,
            metadata: ChunkMetadata {
                filename: filename.to_string(),
                file_type,
                chunk_index,
            },
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a chunk loaded from a vector store.
    pub fn from_storage(
        id: String,
        document_id: String,
        chunk_text: String,
        metadata: ChunkMetadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            chunk_text,
            metadata,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }

    pub fn chunk_index(&self) -> usize {
        self.metadata.chunk_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_text.trim().is_empty()
    }

    pub fn character_count(&self) -> usize {
        self.chunk_text.chars().count()
    }
}
