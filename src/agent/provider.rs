//! Pluggable LLM provider trait.
//!
//! Implementations translate [`ChatRequest`]/[`ChatResponse`] into
//! provider-specific SDK calls. Which implementation backs a given model
//! spec is decided by the [`ProviderRegistry`](super::ProviderRegistry).

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::AgentError;

/// Trait for LLM provider backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider scheme (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures or unreadable responses.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError>;
}
