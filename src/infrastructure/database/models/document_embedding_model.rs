use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;

use crate::domain::entities::{ChunkMetadata, RetrievedContext};
use crate::domain::repositories::vector_repository::IndexedChunk;
use crate::domain::value_objects::DocumentType;
use crate::infrastructure::database::schema::document_embeddings;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = document_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentEmbeddingModel {
    pub id: String,
    pub document_id: String,
    pub document: String,
    pub filename: String,
    pub file_type: String,
    pub chunk_index: i32,
    pub model_name: String,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentEmbeddingModel {
    pub id: String,
    pub document_id: String,
    pub document: String,
    pub filename: String,
    pub file_type: String,
    pub chunk_index: i32,
    pub model_name: String,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

impl From<&IndexedChunk> for NewDocumentEmbeddingModel {
    fn from(record: &IndexedChunk) -> Self {
        let metadata = record.chunk.metadata();
        Self {
            id: record.chunk.id().to_string(),
            document_id: record.chunk.document_id().to_string(),
            document: record.chunk.chunk_text().to_string(),
            filename: metadata.filename.clone(),
            file_type: metadata.file_type.as_str().to_string(),
            chunk_index: metadata.chunk_index as i32,
            model_name: record.embedding.model_name().to_string(),
            embedding: Vector::from(record.embedding.vector().to_vec()),
            created_at: record.chunk.created_at(),
        }
    }
}

impl DocumentEmbeddingModel {
    pub fn into_context(self, distance: f64) -> Result<RetrievedContext, String> {
        Ok(RetrievedContext {
            text: self.document,
            distance: distance as f32,
            metadata: ChunkMetadata {
                filename: self.filename,
                file_type: DocumentType::from_string(&self.file_type)?,
                chunk_index: self.chunk_index.max(0) as usize,
            },
        })
    }
}
