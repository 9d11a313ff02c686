use reqwest::{Client, StatusCode, multipart};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            BackendError::Connection(error.without_url().to_string())
        } else {
            BackendError::Request(error.without_url().to_string())
        }
    }
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(default)]
    answer: Option<String>,
}

/// Talks to the document Q&A API on behalf of the chat page.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key.as_deref().unwrap_or_default())
    }

    /// Returns the answer field of a successful `/ask` call, if the backend sent one.
    pub async fn ask(&self, query: &str) -> Result<Option<String>, BackendError> {
        let response = self
            .client
            .post(format!("{}/ask", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: AskResponse = response.json().await?;
        Ok(body.answer)
    }

    /// Sends one file as its own `/upload/batch` request.
    pub async fn upload_file(&self, filename: &str, content: Vec<u8>) -> Result<(), BackendError> {
        let part = multipart::Part::bytes(content).file_name(filename.to_string());
        let form = multipart::Form::new().part("files", part);

        let response = self
            .client
            .post(format!("{}/upload/batch", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Multipart,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::post,
    };
    use serde_json::Value;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> BackendClient {
        BackendClient::new(
            base_url,
            Some("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_ask_sends_query_and_bearer() {
        let router = Router::new().route(
            "/ask",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "answer": format!("{} / {}", body["query"].as_str().unwrap_or_default(), auth),
                    "sources": []
                }))
            }),
        );
        let base = spawn_backend(router).await;

        let answer = client(&base).ask("what is it?").await.unwrap();
        assert_eq!(answer.as_deref(), Some("what is it? / Bearer test-key"));
    }

    #[tokio::test]
    async fn test_ask_non_200() {
        let router = Router::new().route(
            "/ask",
            post(|| async { (AxumStatus::BAD_REQUEST, Json(json!({"detail": "Query cannot be empty"}))) }),
        );
        let base = spawn_backend(router).await;

        match client(&base).ask("").await {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("Query cannot be empty"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{}", addr)).ask("hello").await;
        assert!(matches!(result, Err(BackendError::Connection(_))));
    }

    #[tokio::test]
    async fn test_upload_sends_files_field() {
        let router = Router::new().route(
            "/upload/batch",
            post(|mut multipart: Multipart| async move {
                let mut names = Vec::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    assert_eq!(field.name(), Some("files"));
                    names.push(field.file_name().unwrap_or_default().to_string());
                }
                Json(json!({ "message": "queued", "results": names }))
            }),
        );
        let base = spawn_backend(router).await;

        client(&base)
            .upload_file("notes.txt", b"hello".to_vec())
            .await
            .unwrap();
    }
}
