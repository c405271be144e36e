//! Dispatch table for the direct function-calling host.
//!
//! Maps tool names from the model's [`ToolCall`]s onto registered handlers.
//! Nothing here fails the agent loop: oversized or malformed arguments,
//! unknown tools and misuse all come back as `is_error` results the model
//! can react to.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::capability::ToolsCapability;
use super::definition::{ToolCall, ToolDefinition, ToolResult};
use super::exposure::{RegisteredTool, direct_tools};

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 100_000;

/// Executes tool calls against registered handlers.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutor {
    tools: HashMap<String, RegisteredTool>,
    definitions: Vec<ToolDefinition>,
}

impl ToolExecutor {
    /// Creates an executor over the given registrations.
    #[must_use]
    pub fn new(tools: Vec<RegisteredTool>) -> Self {
        let definitions = tools.iter().map(|t| t.definition.clone()).collect();
        let tools = tools
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        Self { tools, definitions }
    }

    /// Executor serving the search tools of `capability`.
    #[must_use]
    pub fn for_capability(capability: Arc<ToolsCapability>) -> Self {
        Self::new(direct_tools(capability))
    }

    /// Definitions to advertise to the model, in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Dispatches a tool call to its handler.
    ///
    /// Validates raw argument size before decoding.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return error_result(
                call,
                format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            );
        }

        let Some(tool) = self.tools.get(&call.name) else {
            return error_result(call, format!("unknown tool: {}", call.name));
        };

        // Some models send an empty string for "no arguments".
        let raw = if call.arguments.trim().is_empty() {
            "{}"
        } else {
            call.arguments.as_str()
        };
        let arguments: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                return error_result(call, format!("{}: invalid arguments: {e}", call.name));
            }
        };

        match tool.call(arguments).await {
            Ok(content) => {
                debug!(tool = %call.name, bytes = content.len(), "tool call succeeded");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    content,
                    is_error: false,
                }
            }
            Err(e) => error_result(call, e.to_string()),
        }
    }
}

fn error_result(call: &ToolCall, content: String) -> ToolResult {
    debug!(tool = %call.name, error = %content, "tool call rejected");
    ToolResult {
        tool_call_id: call.id.clone(),
        content,
        is_error: true,
    }
}
