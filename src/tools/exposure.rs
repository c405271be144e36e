//! Registration of the tools into agent hosts.
//!
//! Both hosts receive handlers that captured an `Arc<ToolsCapability>` when
//! they were registered. The direct host calls them in-process; the MCP
//! server (see [`crate::mcp`]) is built by a factory closure holding the same
//! `Arc`, so the client itself never crosses the process boundary.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::ToolError;

use super::capability::ToolsCapability;
use super::definition::{ToolDefinition, ToolSet};

/// Server name external processes see the tools under.
pub const MCP_SERVER_NAME: &str = "tavily";

/// Async handler bound to one tool.
pub type ToolHandler =
    Arc<dyn Fn(serde_json::Value) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// A tool definition paired with its captured handler.
#[derive(Clone)]
pub struct RegisteredTool {
    /// What the model sees.
    pub definition: ToolDefinition,
    handler: ToolHandler,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

impl RegisteredTool {
    /// Pairs a definition with a handler.
    #[must_use]
    pub fn new(definition: ToolDefinition, handler: ToolHandler) -> Self {
        Self {
            definition,
            handler,
        }
    }

    /// Tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Invokes the handler with decoded JSON arguments.
    ///
    /// # Errors
    ///
    /// Whatever [`ToolError`] the tool reports for misuse.
    pub async fn call(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        (self.handler)(arguments).await
    }
}

/// Builds the direct-mode registrations for every tool of `capability`.
#[must_use]
pub fn direct_tools(capability: Arc<ToolsCapability>) -> Vec<RegisteredTool> {
    ToolSet::search_tools()
        .definitions()
        .iter()
        .cloned()
        .map(|definition| {
            let cap = Arc::clone(&capability);
            let name = definition.name.clone();
            let handler: ToolHandler = Arc::new(move |arguments| {
                let cap = Arc::clone(&cap);
                let name = name.clone();
                Box::pin(async move { cap.invoke(&name, arguments).await })
            });
            RegisteredTool::new(definition, handler)
        })
        .collect()
}

/// Qualifies tool names as `mcp__<server>__<tool>`.
///
/// This is how MCP-driven CLIs name external tools in their allow-lists,
/// keeping them apart from built-ins such as a native web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolNamespace {
    server: &'static str,
}

impl Default for ToolNamespace {
    fn default() -> Self {
        Self::new(MCP_SERVER_NAME)
    }
}

impl ToolNamespace {
    /// Namespace for the given server name.
    #[must_use]
    pub const fn new(server: &'static str) -> Self {
        Self { server }
    }

    /// Server name.
    #[must_use]
    pub const fn server(&self) -> &'static str {
        self.server
    }

    /// `search` becomes `mcp__tavily__search`.
    #[must_use]
    pub fn qualify(&self, tool: &str) -> String {
        format!("mcp__{}__{tool}", self.server)
    }

    /// Inverse of [`qualify`](Self::qualify); `None` for foreign names.
    #[must_use]
    pub fn strip<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix("mcp__")?
            .strip_prefix(self.server)?
            .strip_prefix("__")
            .filter(|tool| !tool.is_empty())
    }

    /// Qualified names of every tool in `set`.
    #[must_use]
    pub fn allowed_tools(&self, set: &ToolSet) -> Vec<String> {
        set.definitions()
            .iter()
            .map(|d| self.qualify(&d.name))
            .collect()
    }
}
