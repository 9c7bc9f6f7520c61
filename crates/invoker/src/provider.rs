use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    pub usage: Usage,
    /// Full provider response, for callers that want to show it verbatim.
    pub raw: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("model call timed out after {0}s")]
    Timeout(u64),

    #[error("model transport error: {0}")]
    Transport(String),

    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl InvokeError {
    /// Worth retrying by the caller; nothing here retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            InvokeError::Timeout(_) | InvokeError::Transport(_) => true,
            InvokeError::Status { status, .. } => *status == 429 || *status >= 500,
            InvokeError::MalformedResponse(_) => false,
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion, InvokeError>;
    fn info(&self) -> ProviderInfo;
}
