//! LLM abstraction and Gemini client.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation api error: {0}")]
    Api(String),
}

/// A text-generation backend: one prompt in, one completion out.
///
/// Network failures, auth failures, quota rejections, and malformed responses all
/// surface as `LlmError`; callers do not need to distinguish them, only log them.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
