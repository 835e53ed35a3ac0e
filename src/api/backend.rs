use async_trait::async_trait;

use super::types::{ApiError, ChatReply};
use crate::chat::Language;

/// Remote answering service as seen by the conversation controller
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask one question. Ordinary refusals come back as `success == false`;
    /// `Err` is reserved for transport faults.
    async fn send_message(&self, text: &str, language: Language) -> Result<ChatReply, ApiError>;

    /// Liveness check. Resolves `false` on any fault.
    async fn check_health(&self) -> bool;
}
