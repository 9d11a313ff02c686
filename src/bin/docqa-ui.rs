use docqa::config::UiConfig;
use docqa::presentation::web::UiServer;
use docqa::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing("docqa=info,tower_http=info");

    let config = match UiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY is not set; chat and upload requests will be refused");
    }
    tracing::info!(backend = %config.backend_url, "Starting document Q&A web UI");

    UiServer::new(&config)?.run().await
}
