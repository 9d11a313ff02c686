use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{AskQuestionUseCase, ask_question::AskQuestionRequest};
use crate::presentation::http::dto::{AskRequestDto, AskResponseDto};
use crate::presentation::http::errors::ApiError;

pub struct QaHandler {
    ask_question_use_case: Arc<AskQuestionUseCase>,
}

impl QaHandler {
    pub fn new(ask_question_use_case: Arc<AskQuestionUseCase>) -> Self {
        Self {
            ask_question_use_case,
        }
    }

    pub async fn ask(
        State(handler): State<Arc<QaHandler>>,
        payload: Result<Json<AskRequestDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiError> {
        let Json(request) = payload.map_err(|e| ApiError::unprocessable(e.body_text()))?;

        let response = handler
            .ask_question_use_case
            .execute(AskQuestionRequest {
                query: request.query,
            })
            .await?;

        Ok((StatusCode::OK, Json(AskResponseDto::from(response))))
    }
}
