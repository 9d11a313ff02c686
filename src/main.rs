use docqa::config::AppConfig;
use docqa::infrastructure::container::AppContainer;
use docqa::presentation::http::HttpServer;
use docqa::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing("docqa=info,tower_http=info");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %config.host,
        port = config.port,
        workers = config.worker_count,
        embedding_model = %config.embeddings.model_name,
        llm_model = %config.gemini.model,
        "Starting document Q&A API"
    );

    let container = AppContainer::new(config).await?;
    let server = HttpServer::new(&container);
    server.run().await
}
