use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::backend_client::BackendClient;
use super::handlers::ChatHandler;
use super::routes::ui_routes;
use crate::config::UiConfig;

pub struct UiServer {
    chat_handler: Arc<ChatHandler>,
    host: String,
    port: u16,
    max_upload_bytes: usize,
}

impl UiServer {
    pub fn new(config: &UiConfig) -> Result<Self, reqwest::Error> {
        let backend = BackendClient::new(
            config.backend_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            chat_handler: Arc::new(ChatHandler::new(backend)),
            host: config.host.clone(),
            port: config.port,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    pub fn router(&self) -> Router {
        ui_routes(self.chat_handler.clone(), self.max_upload_bytes).layer(
            TraceLayer::new_for_http()
                .on_request(
                    |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                        tracing::info!("Received request: {} {}", request.method(), request.uri());
                    },
                )
                .on_response(
                    |response: &axum::http::Response<axum::body::Body>,
                     latency: Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            "Response: {} (took {} ms)",
                            response.status(),
                            latency.as_millis()
                        );
                    },
                ),
        )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        tracing::info!("Web UI listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::web::handlers::{ChatMessage, StatusResponse};
    use crate::presentation::web::messages::{API_KEY_MISSING, BACKEND_UNREACHABLE};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn config(backend_url: String, api_key: Option<&str>) -> UiConfig {
        UiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            backend_url,
            api_key: api_key.map(str::to_string),
            request_timeout_secs: 5,
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn ask(message: &str) -> Request<Body> {
        Request::post("/api/ask")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "message": message }).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let server = UiServer::new(&config(closed_port_url().await, Some("k"))).unwrap();
        let response = server
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/api/ask"));
    }

    #[tokio::test]
    async fn test_status_without_key() {
        let server = UiServer::new(&config(closed_port_url().await, None)).unwrap();
        let response = server
            .router()
            .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();
        assert!(!status.api_key_configured);
    }

    #[tokio::test]
    async fn test_ask_without_key() {
        let server = UiServer::new(&config(closed_port_url().await, None)).unwrap();
        let response = server.router().oneshot(ask("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let reply: ChatMessage = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply, ChatMessage::assistant(API_KEY_MISSING));
    }

    #[tokio::test]
    async fn test_ask_with_backend_down() {
        let server = UiServer::new(&config(closed_port_url().await, Some("k"))).unwrap();
        let response = server.router().oneshot(ask("hello")).await.unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let reply: ChatMessage = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply.content, BACKEND_UNREACHABLE);
    }
}
