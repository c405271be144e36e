//! MCP server exposing the search tools.
//!
//! Each tool method forwards to the shared [`ToolsCapability`], so the text
//! an MCP client receives is exactly what a direct caller would get.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use crate::error::ToolError;
use crate::tools::{ContextToolParams, ExtractToolParams, SearchToolParams, ToolsCapability};

/// Maps a tool outcome onto an MCP result. Misuse is a tool-level error,
/// not a protocol error, so the calling agent can read and correct it.
fn into_call_result(outcome: Result<String, ToolError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => CallToolResult::error(vec![Content::text(err.to_string())]),
    }
}

/// Tavily MCP server.
///
/// Built by a factory closure that captured the capability `Arc`; the HTTP
/// transport creates one instance per session.
#[derive(Clone)]
pub struct TavilyMcpServer {
    tool_router: ToolRouter<Self>,
    capability: Arc<ToolsCapability>,
}

impl std::fmt::Debug for TavilyMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyMcpServer")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

#[tool_router]
impl TavilyMcpServer {
    #[tool(
        name = "search",
        description = "Search the web for current information. Returns ranked results with title, URL, relevance score and a content snippet. Use search_depth \"advanced\" for harder questions; max_results is 1-20 (default 5)."
    )]
    async fn search(
        &self,
        Parameters(params): Parameters<SearchToolParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_call_result(self.capability.search(params).await))
    }

    #[tool(
        name = "extract",
        description = "Extract the full text of web pages. Accepts up to 20 absolute http(s) URLs per call; duplicates are removed and extra URLs are skipped. Reports failed URLs alongside the extracted content."
    )]
    async fn extract(
        &self,
        Parameters(params): Parameters<ExtractToolParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_call_result(self.capability.extract(params).await))
    }

    #[tool(
        name = "context",
        description = "Build a compact, source-attributed context for a query: a JSON list of {url, content} entries that fits within max_tokens (default 4000). Use it to ground an answer in web sources."
    )]
    async fn context(
        &self,
        Parameters(params): Parameters<ContextToolParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_call_result(self.capability.context(params).await))
    }
}

#[tool_handler]
impl ServerHandler for TavilyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tavily-tools".to_string(),
                title: Some("Tavily Tools MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: Some("https://docs.tavily.com".to_string()),
            },
            instructions: Some(
                "Web research tools backed by Tavily. Use `search` for ranked results, \
                 `extract` for full page text, and `context` for a token-bounded evidence \
                 bundle. Remote failures are reported in the tool output text."
                    .to_string(),
            ),
        }
    }
}

impl TavilyMcpServer {
    /// Creates a server over a shared capability.
    #[must_use]
    pub fn new(capability: Arc<ToolsCapability>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            capability,
        }
    }

    /// The capability this server forwards to.
    #[must_use]
    pub const fn capability(&self) -> &Arc<ToolsCapability> {
        &self.capability
    }
}
