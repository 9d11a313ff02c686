use std::sync::Arc;

use crate::application::ports::LanguageModel;
use crate::domain::entities::RetrievedContext;

const PROMPT_TEMPLATE: &str = "You are a helpful AI assistant for document question-answering.

Context:
{context}

Question: {question}

Provide a comprehensive and precise answer based on the given context.
If the context is insufficient, state that clearly.

Helpful Answer:";

const API_KEY_PROBE: &str = "Hello, can you confirm the API is working?";

/// Builds the grounded prompt and asks the language model for an answer.
pub struct QaService {
    language_model: Arc<dyn LanguageModel>,
}

impl QaService {
    pub fn new(language_model: Arc<dyn LanguageModel>) -> Self {
        Self { language_model }
    }

    pub fn build_prompt(question: &str, context: &[RetrievedContext]) -> String {
        let context_text = context
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        fill_template(
            PROMPT_TEMPLATE,
            &[("{context}", context_text.as_str()), ("{question}", question)],
        )
    }

    /// Model failures come back as answer text rather than an error.
    pub async fn generate_answer(&self, question: &str, context: &[RetrievedContext]) -> String {
        let prompt = Self::build_prompt(question, context);

        match self.language_model.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Answer generation failed: {}", e);
                format!("Error generating answer: {}", e)
            }
        }
    }

    pub async fn validate_api_key(&self) -> bool {
        match self.language_model.generate(API_KEY_PROBE).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("API key validation failed: {}", e);
                false
            }
        }
    }

    pub fn model_name(&self) -> &str {
        self.language_model.model_name()
    }
}

/// Substitutes placeholders in one left-to-right pass; inserted values are
/// never scanned again.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((at, key, value)) = values
        .iter()
        .filter_map(|&(key, value)| rest.find(key).map(|at| (at, key, value)))
        .min_by_key(|&(at, _, _)| at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::language_model::LanguageModelError;
    use crate::domain::entities::ChunkMetadata;
    use crate::domain::value_objects::DocumentType;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        async fn generate(&self, prompt: &str) -> Result<String, LanguageModelError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(LanguageModelError::ApiError {
                    status: 400,
                    message: "API key not valid".to_string(),
                })
            } else {
                Ok("Paris".to_string())
            }
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn context(text: &str) -> RetrievedContext {
        RetrievedContext {
            text: text.to_string(),
            distance: 0.1,
            metadata: ChunkMetadata {
                filename: "facts.txt".to_string(),
                file_type: DocumentType::Text,
                chunk_index: 0,
            },
        }
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = QaService::build_prompt(
            "What is the capital?",
            &[context("France is in Europe."), context("Paris is the capital.")],
        );

        assert!(prompt.starts_with(
            "You are a helpful AI assistant for document question-answering.\n\nContext:\n"
        ));
        assert!(prompt.contains("France is in Europe.\n\nParis is the capital."));
        assert!(prompt.contains("\n\nQuestion: What is the capital?\n\n"));
        assert!(prompt.ends_with("state that clearly.\n\nHelpful Answer:"));
    }

    #[test]
    fn test_placeholders_inside_context_are_kept() {
        let prompt = QaService::build_prompt(
            "What is X?",
            &[context("Template docs use {question} as a placeholder.")],
        );

        assert!(prompt.contains("Template docs use {question} as a placeholder."));
        assert!(prompt.contains("Question: What is X?"));
        assert_eq!(prompt.matches("What is X?").count(), 1);
    }

    #[test]
    fn test_placeholders_inside_question_are_kept() {
        let prompt = QaService::build_prompt("What does {context} mean?", &[context("Docs.")]);

        assert!(prompt.contains("Question: What does {context} mean?"));
        assert_eq!(prompt.matches("Docs.").count(), 1);
    }

    #[tokio::test]
    async fn test_api_key_check_sends_greeting() {
        let model = Arc::new(RecordingModel {
            prompts: Mutex::new(Vec::new()),
            fail: false,
        });
        let service = QaService::new(model.clone());

        assert!(service.validate_api_key().await);
        assert_eq!(
            model.prompts.lock().unwrap().as_slice(),
            ["Hello, can you confirm the API is working?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_generate_answer() {
        let model = Arc::new(RecordingModel {
            prompts: Mutex::new(Vec::new()),
            fail: false,
        });
        let service = QaService::new(model.clone());

        let answer = service
            .generate_answer("Capital?", &[context("Paris is the capital.")])
            .await;

        assert_eq!(answer, "Paris");
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_model_error_becomes_answer_text() {
        let service = QaService::new(Arc::new(RecordingModel {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        }));

        let answer = service.generate_answer("Capital?", &[]).await;
        assert_eq!(
            answer,
            "Error generating answer: API error (400): API key not valid"
        );
        assert!(!service.validate_api_key().await);
    }
}
