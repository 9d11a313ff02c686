use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use crate::domain::entities::{ChunkMetadata, RetrievedContext, cosine_similarity};
use crate::domain::repositories::vector_repository::{
    COLLECTION_NAME, DocumentSummary, IndexedChunk, VectorRepository, VectorRepositoryError,
};

const DISTANCE_SPACE: &str = "cosine";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    id: String,
    document_id: String,
    text: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
    model_name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    collection: String,
    space: String,
    records: Vec<StoredRecord>,
}

/// File-backed vector index: one JSON collection under the vector database
/// directory, held in memory and rewritten after every change. Queries are a
/// brute-force cosine scan.
pub struct LocalVectorRepository {
    path: PathBuf,
    dimension: usize,
    records: RwLock<Vec<StoredRecord>>,
}

impl LocalVectorRepository {
    /// Opens (or creates) the collection stored in `directory`. Every stored
    /// and queried vector must have `dimension` components.
    pub async fn open(directory: &Path, dimension: usize) -> Result<Self, VectorRepositoryError> {
        fs::create_dir_all(directory)
            .await
            .map_err(|e| VectorRepositoryError::StorageError(e.to_string()))?;

        let path = directory.join(format!("{}.json", COLLECTION_NAME));
        let records = match fs::read(&path).await {
            Ok(bytes) => {
                let file: CollectionFile = serde_json::from_slice(&bytes)
                    .map_err(|e| VectorRepositoryError::SerializationError(e.to_string()))?;
                file.records
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(VectorRepositoryError::StorageError(e.to_string())),
        };

        if let Some(record) = records.iter().find(|r| r.embedding.len() != dimension) {
            return Err(VectorRepositoryError::DimensionMismatch {
                expected: dimension,
                actual: record.embedding.len(),
            });
        }

        tracing::info!(
            "Opened vector collection '{}' at {} ({} chunks)",
            COLLECTION_NAME,
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            dimension,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_dimension(&self, actual: usize) -> Result<(), VectorRepositoryError> {
        if actual != self.dimension {
            return Err(VectorRepositoryError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }

    async fn persist(&self, records: &[StoredRecord]) -> Result<(), VectorRepositoryError> {
        let file = CollectionFile {
            collection: COLLECTION_NAME.to_string(),
            space: DISTANCE_SPACE.to_string(),
            records: records.to_vec(),
        };
        let bytes = serde_json::to_vec(&file)
            .map_err(|e| VectorRepositoryError::SerializationError(e.to_string()))?;

        // write-then-rename so a crash never leaves a truncated collection
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| VectorRepositoryError::StorageError(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| VectorRepositoryError::StorageError(e.to_string()))
    }
}

#[async_trait]
impl VectorRepository for LocalVectorRepository {
    async fn add(&self, records: &[IndexedChunk]) -> Result<usize, VectorRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }

        for record in records {
            self.check_dimension(record.embedding.dimension())?;
        }

        let mut stored = self.records.write().await;
        let mut seen: HashSet<String> = stored.iter().map(|r| r.id.clone()).collect();

        let fresh: Vec<StoredRecord> = records
            .iter()
            .filter(|record| seen.insert(record.chunk.id().to_string()))
            .map(|record| StoredRecord {
                id: record.chunk.id().to_string(),
                document_id: record.chunk.document_id().to_string(),
                text: record.chunk.chunk_text().to_string(),
                metadata: record.chunk.metadata().clone(),
                embedding: record.embedding.vector().to_vec(),
                model_name: record.embedding.model_name().to_string(),
                created_at: record.chunk.created_at(),
            })
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        // the shared index only changes once the collection file is written
        let inserted = fresh.len();
        let mut updated = stored.clone();
        updated.extend(fresh);
        self.persist(&updated).await?;

        *stored = updated;
        Ok(inserted)
    }

    async fn existing_ids(&self, ids: &[String]) -> Result<HashSet<String>, VectorRepositoryError> {
        let stored = self.records.read().await;
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();

        Ok(stored
            .iter()
            .filter(|r| wanted.contains(r.id.as_str()))
            .map(|r| r.id.clone())
            .collect())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedContext>, VectorRepositoryError> {
        self.check_dimension(vector.len())?;
        let stored = self.records.read().await;

        let mut scored: Vec<(f32, &StoredRecord)> = stored
            .iter()
            .map(|r| (1.0 - cosine_similarity(&r.embedding, vector), r))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(distance, r)| RetrievedContext {
                text: r.text.clone(),
                distance,
                metadata: r.metadata.clone(),
            })
            .collect())
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, VectorRepositoryError> {
        let stored = self.records.read().await;
        let mut documents: BTreeMap<&str, DocumentSummary> = BTreeMap::new();

        for record in stored.iter() {
            documents
                .entry(record.document_id.as_str())
                .and_modify(|d| d.chunk_count += 1)
                .or_insert_with(|| DocumentSummary {
                    document_id: record.document_id.clone(),
                    filename: record.metadata.filename.clone(),
                    file_type: record.metadata.file_type,
                    chunk_count: 1,
                });
        }

        Ok(documents.into_values().collect())
    }

    async fn delete_document(&self, document_id: &str) -> Result<usize, VectorRepositoryError> {
        let mut stored = self.records.write().await;
        let remaining: Vec<StoredRecord> = stored
            .iter()
            .filter(|r| r.document_id != document_id)
            .cloned()
            .collect();
        let removed = stored.len() - remaining.len();

        if removed > 0 {
            self.persist(&remaining).await?;
            *stored = remaining;
        }

        Ok(removed)
    }

    async fn count(&self) -> Result<usize, VectorRepositoryError> {
        Ok(self.records.read().await.len())
    }
}
