use serde::{Deserialize, Serialize};

use crate::application::use_cases::ask_question::AskQuestionResponse;
use crate::domain::entities::RetrievedContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequestDto {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponseDto {
    pub answer: String,
    pub sources: Vec<RetrievedContext>,
}

impl From<AskQuestionResponse> for AskResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        Self {
            answer: response.answer,
            sources: response.sources,
        }
    }
}
