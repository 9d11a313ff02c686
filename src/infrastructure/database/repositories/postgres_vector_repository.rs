use std::collections::HashSet;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};

use crate::domain::entities::RetrievedContext;
use crate::domain::repositories::vector_repository::{
    DocumentSummary, IndexedChunk, VectorRepository, VectorRepositoryError,
};
use crate::domain::value_objects::DocumentType;
use crate::infrastructure::database::models::{DocumentEmbeddingModel, NewDocumentEmbeddingModel};
use crate::infrastructure::database::schema::document_embeddings::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

/// pgvector-backed index. Distances come from the `<=>` cosine operator.
pub struct PostgresVectorRepository {
    pool: DbPool,
    dimension: usize,
}

impl PostgresVectorRepository {
    pub fn new(pool: DbPool, dimension: usize) -> Self {
        Self { pool, dimension }
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

    /// Runs a blocking diesel closure on the blocking thread pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T, VectorRepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, VectorRepositoryError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection_from_pool(&pool)
                .map_err(|e| VectorRepositoryError::StorageError(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| VectorRepositoryError::StorageError(e.to_string()))?
    }
}

fn storage_error(e: diesel::result::Error) -> VectorRepositoryError {
    VectorRepositoryError::StorageError(e.to_string())
}

#[async_trait]
impl VectorRepository for PostgresVectorRepository {
    async fn add(&self, records: &[IndexedChunk]) -> Result<usize, VectorRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }
        for record in records {
            self.check_dimension(record.embedding.dimension())?;
        }

        let rows: Vec<NewDocumentEmbeddingModel> =
            records.iter().map(NewDocumentEmbeddingModel::from).collect();

        self.with_connection(move |conn| {
            diesel::insert_into(document_embeddings)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(storage_error)
        })
        .await
    }

    async fn existing_ids(&self, ids: &[String]) -> Result<HashSet<String>, VectorRepositoryError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let wanted = ids.to_vec();

        self.with_connection(move |conn| {
            document_embeddings
                .filter(id.eq_any(&wanted))
                .select(id)
                .load::<String>(conn)
                .map(|found| found.into_iter().collect())
                .map_err(storage_error)
        })
        .await
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedContext>, VectorRepositoryError> {
        self.check_dimension(vector.len())?;
        let query_vector = Vector::from(vector.to_vec());
        let limit = top_k as i64;

        let rows = self
            .with_connection(move |conn| {
                document_embeddings
                    .select((
                        DocumentEmbeddingModel::as_select(),
                        embedding.cosine_distance(query_vector.clone()),
                    ))
                    .order(embedding.cosine_distance(query_vector))
                    .limit(limit)
                    .load::<(DocumentEmbeddingModel, f64)>(conn)
                    .map_err(storage_error)
            })
            .await?;

        rows.into_iter()
            .map(|(model, distance)| {
                model
                    .into_context(distance)
                    .map_err(VectorRepositoryError::SerializationError)
            })
            .collect()
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, VectorRepositoryError> {
        let rows = self
            .with_connection(|conn| {
                document_embeddings
                    .group_by((document_id, filename, file_type))
                    .select((document_id, filename, file_type, count_star()))
                    .order(document_id.asc())
                    .load::<(String, String, String, i64)>(conn)
                    .map_err(storage_error)
            })
            .await?;

        rows.into_iter()
            .map(|(doc_id, name, kind, chunks)| {
                Ok(DocumentSummary {
                    document_id: doc_id,
                    filename: name,
                    file_type: DocumentType::from_string(&kind)
                        .map_err(VectorRepositoryError::SerializationError)?,
                    chunk_count: chunks as usize,
                })
            })
            .collect()
    }

    async fn delete_document(&self, target: &str) -> Result<usize, VectorRepositoryError> {
        let target = target.to_string();

        self.with_connection(move |conn| {
            diesel::delete(document_embeddings.filter(document_id.eq(&target)))
                .execute(conn)
                .map_err(storage_error)
        })
        .await
    }

    async fn count(&self) -> Result<usize, VectorRepositoryError> {
        self.with_connection(|conn| {
            document_embeddings
                .count()
                .get_result::<i64>(conn)
                .map(|n| n as usize)
                .map_err(storage_error)
        })
        .await
    }
}
