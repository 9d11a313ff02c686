use axum::{
    Json,
    extract::{Multipart, State, rejection::JsonRejection},
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::backend_client::BackendClient;
use super::messages::{API_KEY_MISSING, NO_DOCUMENTS, assistant_reply, upload_message};
use crate::presentation::http::errors::ApiError;

const INDEX_HTML: &str = include_str!("assets/index.html");

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub api_key_configured: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileUploadResult {
    pub filename: String,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResults {
    pub results: Vec<FileUploadResult>,
}

pub struct ChatHandler {
    backend: BackendClient,
}

impl ChatHandler {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn index() -> Html<&'static str> {
        Html(INDEX_HTML)
    }

    pub async fn status(State(handler): State<Arc<ChatHandler>>) -> impl IntoResponse {
        let configured = handler.backend.has_api_key();
        let message = if configured {
            "Using Gemini API Key from environment variables".to_string()
        } else {
            "GOOGLE_API_KEY not found in environment variables. Please add it to your .env file."
                .to_string()
        };

        Json(StatusResponse {
            api_key_configured: configured,
            message,
        })
    }

    pub async fn ask(
        State(handler): State<Arc<ChatHandler>>,
        payload: Result<Json<ChatRequest>, JsonRejection>,
    ) -> Result<Json<ChatMessage>, ApiError> {
        let Json(request) = payload.map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        if request.message.trim().is_empty() {
            return Err(ApiError::bad_request("Message cannot be empty"));
        }
        if !handler.backend.has_api_key() {
            return Ok(Json(ChatMessage::assistant(API_KEY_MISSING)));
        }

        let outcome = handler.backend.ask(&request.message).await;
        if let Err(e) = &outcome {
            tracing::warn!("Backend /ask failed: {}", e);
        }

        Ok(Json(ChatMessage::assistant(assistant_reply(outcome))))
    }

    /// Forwards each `files` part to the API as a separate upload.
    pub async fn upload(
        State(handler): State<Arc<ChatHandler>>,
        mut multipart: Multipart,
    ) -> Result<Json<UploadResults>, ApiError> {
        let mut files = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?
        {
            if field.name() != Some("files") {
                continue;
            }
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            files.push((filename, content.to_vec()));
        }

        if files.is_empty() {
            return Err(ApiError::bad_request(NO_DOCUMENTS));
        }
        if !handler.backend.has_api_key() {
            return Err(ApiError::bad_request(API_KEY_MISSING));
        }

        let mut results = Vec::with_capacity(files.len());
        for (filename, content) in files {
            let outcome = handler.backend.upload_file(&filename, content).await;
            let message = upload_message(&filename, &outcome);
            match &outcome {
                Ok(()) => tracing::info!("Forwarded {} to the API", filename),
                Err(e) => tracing::warn!("Upload of {} failed: {}", filename, e),
            }
            results.push(FileUploadResult {
                filename,
                ok: outcome.is_ok(),
                message,
            });
        }

        Ok(Json(UploadResults { results }))
    }
}
