//! Agentic tool-calling loop.
//!
//! Sends the conversation to the model, executes any tool calls it asks
//! for, appends the results and repeats until the model answers in plain
//! text or the iteration limit is reached.

use tracing::debug;

use super::message::{ChatRequest, ChatResponse, assistant_tool_calls_message, tool_message};
use super::provider::LlmProvider;
use crate::error::AgentError;
use crate::tools::ToolExecutor;

/// Outcome of a completed loop.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// The final (tool-free) model response. Its `usage` is summed over
    /// every round.
    pub response: ChatResponse,
    /// Tool calls executed along the way.
    pub tool_calls: usize,
}

/// Runs model → tool calls → tool results → model → … to completion.
///
/// `request` is extended in place with the assistant and tool messages.
/// Tool calls within one round run in the order the model listed them.
///
/// # Errors
///
/// [`AgentError::ToolLoopExceeded`] if the model is still requesting tools
/// after `max_iterations` rounds. Provider errors propagate.
pub async fn agentic_loop(
    provider: &dyn LlmProvider,
    request: &mut ChatRequest,
    executor: &ToolExecutor,
    max_iterations: usize,
) -> Result<LoopOutcome, AgentError> {
    let mut usage = super::message::TokenUsage::default();
    let mut executed = 0;

    for iteration in 0..max_iterations {
        let mut response = provider.chat(request).await?;
        usage.accumulate(response.usage);

        if response.tool_calls.is_empty() {
            debug!(iteration, executed, "agentic loop completed with final text response");
            response.usage = usage;
            return Ok(LoopOutcome {
                response,
                tool_calls: executed,
            });
        }

        debug!(
            iteration,
            tool_count = response.tool_calls.len(),
            "executing tool calls"
        );

        request.messages.push(assistant_tool_calls_message(
            std::mem::take(&mut response.content),
            response.tool_calls.clone(),
        ));

        for call in &response.tool_calls {
            let result = executor.execute(call).await;
            executed += 1;
            debug!(
                tool = %call.name,
                call_id = %call.id,
                is_error = result.is_error,
                "tool execution complete"
            );
            request
                .messages
                .push(tool_message(&result.tool_call_id, &result.content));
        }
    }

    Err(AgentError::ToolLoopExceeded { max_iterations })
}
