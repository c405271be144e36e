//! Agent trait definition.

use async_trait::async_trait;

use super::message::{ChatRequest, TokenUsage, system_message, user_message};
use super::provider::LlmProvider;
use crate::error::AgentError;
use crate::tools::{ToolDefinition, ToolExecutor};

/// Response from an agent execution.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The agent's text output.
    pub content: String,
    /// Token usage, summed over every model call.
    pub usage: TokenUsage,
    /// Why the model stopped generating (e.g. `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
    /// Tool calls executed to produce the answer.
    pub tool_calls: usize,
}

/// An agent: a fixed role (system prompt, model, limits) run against a
/// provider.
///
/// Agents that use tools override [`Agent::tools`] and are run through
/// [`execute_with_tools`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and identification.
    fn name(&self) -> &'static str;

    /// Model identifier to use for this agent.
    fn model(&self) -> &str;

    /// System prompt that defines the agent's role and behavior.
    fn system_prompt(&self) -> &str;

    /// Sampling temperature.
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Maximum tokens for the response.
    fn max_tokens(&self) -> u32 {
        2048
    }

    /// Tool definitions available to this agent. Empty by default.
    fn tools(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    /// Maximum tool-calling loop iterations before aborting.
    fn max_tool_iterations(&self) -> usize {
        10
    }

    /// Builds the opening request for `user_msg`.
    fn request(&self, user_msg: &str, tools: Vec<ToolDefinition>) -> ChatRequest {
        ChatRequest {
            model: self.model().to_string(),
            messages: vec![system_message(self.system_prompt()), user_message(user_msg)],
            temperature: Some(self.temperature()),
            max_tokens: Some(self.max_tokens()),
            tools,
        }
    }

    /// Executes the agent with the given user message (no tools).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on provider failures.
    async fn execute(
        &self,
        provider: &dyn LlmProvider,
        user_msg: &str,
    ) -> Result<AgentResponse, AgentError> {
        let response = provider.chat(&self.request(user_msg, Vec::new())).await?;
        Ok(AgentResponse {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
            tool_calls: 0,
        })
    }
}

/// Executes an agent with tool-calling support.
///
/// Falls through to [`Agent::execute`] when the agent has no tools.
///
/// # Errors
///
/// Returns [`AgentError`] on provider failures or if the tool loop exceeds
/// the agent's max iterations.
pub async fn execute_with_tools(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    user_msg: &str,
    executor: &ToolExecutor,
) -> Result<AgentResponse, AgentError> {
    let tool_defs = agent.tools();
    if tool_defs.is_empty() {
        return agent.execute(provider, user_msg).await;
    }

    let mut request = agent.request(user_msg, tool_defs);
    let outcome = super::agentic_loop::agentic_loop(
        provider,
        &mut request,
        executor,
        agent.max_tool_iterations(),
    )
    .await?;

    Ok(AgentResponse {
        content: outcome.response.content,
        usage: outcome.response.usage,
        finish_reason: outcome.response.finish_reason,
        tool_calls: outcome.tool_calls,
    })
}
