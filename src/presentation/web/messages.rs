use super::backend_client::BackendError;

pub const NO_ANSWER: &str = "I couldn't find an answer to your question.";
pub const REQUEST_FAILED: &str = "I encountered an error processing your request. Please try again.";
pub const BACKEND_UNREACHABLE: &str = "I'm having trouble connecting to the backend service. This could happen if no documents are uploaded yet or if the service is still starting up. Please try uploading some documents first or try again in a moment.";
pub const API_KEY_MISSING: &str = "API key not available. Please check your environment configuration.";
pub const NO_DOCUMENTS: &str = "Please upload at least one document.";

/// Turns the outcome of an `/ask` call into the assistant's chat message.
pub fn assistant_reply(outcome: Result<Option<String>, BackendError>) -> String {
    match outcome {
        Ok(Some(answer)) => answer,
        Ok(None) => NO_ANSWER.to_string(),
        Err(BackendError::Status { .. }) => REQUEST_FAILED.to_string(),
        Err(BackendError::Connection(_)) => BACKEND_UNREACHABLE.to_string(),
        Err(BackendError::Request(e)) => format!("I encountered an error: {}", e),
    }
}

/// Sidebar status line for one uploaded file.
pub fn upload_message(filename: &str, outcome: &Result<(), BackendError>) -> String {
    match outcome {
        Ok(()) => format!("Processed {}", filename),
        Err(BackendError::Status { body, .. }) => {
            format!("Error processing {}: {}", filename, body)
        }
        Err(e) => format!("Error processing {}: {}", filename, e),
    }
}
