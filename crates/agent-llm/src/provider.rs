//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A hosted model that can complete a conversation
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send one request and return the assistant turn it produced.
    ///
    /// Implementations apply their own timeout and retry policy; a returned
    /// error is final.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name (e.g. "anthropic")
    fn name(&self) -> &str;
}
