use std::sync::Arc;

use crate::domain::repositories::VectorRepository;
use crate::domain::repositories::vector_repository::{DocumentSummary, VectorRepositoryError};

pub struct ListDocumentsUseCase {
    vector_repository: Arc<dyn VectorRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(vector_repository: Arc<dyn VectorRepository>) -> Self {
        Self { vector_repository }
    }

    /// Indexed documents ordered by filename.
    pub async fn execute(&self) -> Result<Vec<DocumentSummary>, VectorRepositoryError> {
        let mut documents = self.vector_repository.list_documents().await?;
        documents.sort_by(|a, b| {
            a.filename
                .cmp(&b.filename)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        Ok(documents)
    }
}
