//! Direct function-calling research agent.
//!
//! Holds the tools as a [`ToolExecutor`] over a shared capability and
//! answers questions by letting the model call them in a loop.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::config::AgentConfig;
use super::provider::LlmProvider;
use super::traits::{Agent, AgentResponse, execute_with_tools};
use crate::error::AgentError;
use crate::tools::{ToolDefinition, ToolExecutor, ToolsCapability};

/// System prompt for the research agent.
pub const SYSTEM_PROMPT: &str = "You are a research assistant with live web access. \
Use the `search` tool to find current sources, `extract` to read full pages \
when snippets are not enough, and `context` for a compact evidence bundle. \
Prefer recent, authoritative sources. Cite the URLs you relied on. \
If the tools report an error, say so instead of guessing.";

/// Agent that answers questions with the search tools.
pub struct ResearchAgent {
    model: String,
    max_tokens: u32,
    max_tool_iterations: usize,
    executor: ToolExecutor,
}

impl std::fmt::Debug for ResearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAgent")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_tool_iterations", &self.max_tool_iterations)
            .field("tools", &self.executor.definitions().len())
            .finish()
    }
}

impl ResearchAgent {
    /// Creates the agent; the capability is shared, not copied.
    #[must_use]
    pub fn new(config: &AgentConfig, capability: Arc<ToolsCapability>) -> Self {
        Self {
            model: config.model.model.clone(),
            max_tokens: config.max_tokens,
            max_tool_iterations: config.max_tool_iterations,
            executor: ToolExecutor::for_capability(capability),
        }
    }

    /// Answers `question`, calling tools as the model requests them.
    ///
    /// # Errors
    ///
    /// Provider failures and [`AgentError::ToolLoopExceeded`].
    pub async fn ask(
        &self,
        provider: &dyn LlmProvider,
        question: &str,
    ) -> Result<AgentResponse, AgentError> {
        let response = execute_with_tools(self, provider, question, &self.executor).await?;
        info!(
            agent = self.name(),
            provider = provider.name(),
            tool_calls = response.tool_calls,
            total_tokens = response.usage.total_tokens,
            "research agent answered"
        );
        Ok(response)
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    fn name(&self) -> &'static str {
        "research"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn temperature(&self) -> f32 {
        0.2
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.executor.definitions().to_vec()
    }

    fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }
}
