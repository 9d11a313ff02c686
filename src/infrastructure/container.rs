use std::sync::Arc;

use crate::{
    application::{
        ports::{DocumentExtractor, EmbeddingProvider, FileStorage, JobQueue, LanguageModel},
        services::{DocumentProcessorService, EmbeddingService, QaService},
        use_cases::{
            AskQuestionUseCase, DeleteDocumentUseCase, GetJobStatusUseCase, ListDocumentsUseCase,
            ProcessDocumentUseCase, UploadBatchUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::{JobRepository, VectorRepository},
    infrastructure::{
        database::{PostgresVectorRepository, create_connection_pool, run_migrations},
        external_services::{
            GeminiClient, InferenceEmbeddingProvider,
            document_extractors::CompositeDocumentExtractor,
        },
        file_system::LocalFileStorage,
        memory::InMemoryJobRepository,
        messaging::{BackgroundProcessor, MpscJobQueue},
        text_processing::RecursiveCharacterSplitter,
        vector_store::LocalVectorRepository,
    },
    presentation::http::handlers::{
        DocumentHandler, HealthHandler, JobHandler, QaHandler, UploadHandler,
    },
};

pub struct AppContainer {
    pub config: AppConfig,

    // Repositories
    pub job_repository: Arc<dyn JobRepository>,
    pub vector_repository: Arc<dyn VectorRepository>,

    // External Services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub language_model: Arc<dyn LanguageModel>,
    pub upload_storage: Arc<dyn FileStorage>,
    pub processed_storage: Arc<dyn FileStorage>,

    // Job Queue and Background Processing
    pub job_queue: Arc<dyn JobQueue>,
    pub background_processor: Arc<BackgroundProcessor>,

    // Application Services
    pub embedding_service: Arc<EmbeddingService>,
    pub qa_service: Arc<QaService>,

    // HTTP Handlers
    pub qa_handler: Arc<QaHandler>,
    pub upload_handler: Arc<UploadHandler>,
    pub job_handler: Arc<JobHandler>,
    pub document_handler: Arc<DocumentHandler>,
    pub health_handler: Arc<HealthHandler>,
}

impl AppContainer {
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let vector_repository: Arc<dyn VectorRepository> = match &config.database_url {
            Some(database_url) => {
                let db_pool = create_connection_pool(database_url)?;
                run_migrations(&db_pool)
                    .map_err(|e| format!("Failed to run database migrations: {}", e))?;
                tracing::info!("Using pgvector for the vector index");
                Arc::new(PostgresVectorRepository::new(
                    db_pool,
                    config.embeddings.dimension,
                ))
            }
            None => Arc::new(
                LocalVectorRepository::open(&config.vector_db_path, config.embeddings.dimension)
                    .await
                    .map_err(|e| format!("Failed to open vector database: {}", e))?,
            ),
        };

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(InferenceEmbeddingProvider::new(config.embeddings.clone())?);
        let language_model: Arc<dyn LanguageModel> =
            Arc::new(GeminiClient::new(config.gemini.clone())?);

        Self::from_parts(
            config,
            embedding_provider,
            language_model,
            vector_repository,
            Arc::new(CompositeDocumentExtractor::new()),
        )
    }

    /// Wires everything above the external adapters. Tests supply fakes here.
    pub fn from_parts(
        config: AppConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        language_model: Arc<dyn LanguageModel>,
        vector_repository: Arc<dyn VectorRepository>,
        document_extractor: Arc<dyn DocumentExtractor>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());

        let upload_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(
            config.document_storage_path.clone(),
        ));
        let processed_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(
            config.processed_documents_path.clone(),
        ));

        let text_splitter = Arc::new(RecursiveCharacterSplitter::new(
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        )?);

        // Create application services
        let document_processor = Arc::new(DocumentProcessorService::new(
            document_extractor,
            text_splitter,
        ));
        let embedding_service = Arc::new(EmbeddingService::new(
            embedding_provider.clone(),
            vector_repository.clone(),
        ));
        let qa_service = Arc::new(QaService::new(language_model.clone()));

        // Create job queue and background processor
        let (job_queue, job_receiver) = MpscJobQueue::create_pair();
        let job_queue: Arc<dyn JobQueue> = Arc::new(job_queue);

        let process_document_use_case = Arc::new(ProcessDocumentUseCase::new(
            document_processor,
            embedding_service.clone(),
            upload_storage.clone(),
            processed_storage.clone(),
            job_repository.clone(),
        ));

        let background_processor = Arc::new(
            BackgroundProcessor::new(
                Arc::new(job_receiver),
                job_repository.clone(),
                process_document_use_case,
            )
            .with_worker_count(config.worker_count),
        );

        // Create use cases
        let upload_batch_use_case = Arc::new(UploadBatchUseCase::new(
            upload_storage.clone(),
            job_repository.clone(),
            job_queue.clone(),
        ));
        let ask_question_use_case = Arc::new(AskQuestionUseCase::new(
            embedding_service.clone(),
            qa_service.clone(),
            config.search_top_k,
        ));
        let get_job_status_use_case = Arc::new(GetJobStatusUseCase::new(job_repository.clone()));
        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(vector_repository.clone()));
        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(
            vector_repository.clone(),
            processed_storage.clone(),
        ));

        // Create HTTP handlers
        let qa_handler = Arc::new(QaHandler::new(ask_question_use_case));
        let upload_handler = Arc::new(UploadHandler::new(upload_batch_use_case));
        let job_handler = Arc::new(JobHandler::new(get_job_status_use_case));
        let document_handler = Arc::new(DocumentHandler::new(
            list_documents_use_case,
            delete_document_use_case,
        ));
        let health_handler = Arc::new(HealthHandler::new(
            embedding_service.clone(),
            qa_service.clone(),
            job_queue.clone(),
        ));

        Ok(Self {
            config,
            job_repository,
            vector_repository,
            embedding_provider,
            language_model,
            upload_storage,
            processed_storage,
            job_queue,
            background_processor,
            embedding_service,
            qa_service,
            qa_handler,
            upload_handler,
            job_handler,
            document_handler,
            health_handler,
        })
    }
}
