use serde::{Deserialize, Serialize};

/// Body of the question request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub language: &'static str,
}

/// Answering-service reply. `success == false` is an in-band failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    #[serde(default)]
    pub response: String,
}

#[cfg(test)]
impl ChatReply {
    pub fn answered(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            response: String::new(),
        }
    }
}

/// Transport-level faults from the answering service
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Parse error: {message}")]
    Parse { message: String },
}
