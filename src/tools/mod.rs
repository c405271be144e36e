//! Search, extract and context as agent tools.
//!
//! [`ToolsCapability`] validates input, calls a [`SearchService`] and renders
//! the outcome as text. [`exposure`] registers it into the direct host
//! ([`ToolExecutor`]) and names it for the MCP host ([`ToolNamespace`]).
//!
//! [`SearchService`]: crate::search::SearchService

pub mod capability;
pub mod definition;
pub mod executor;
pub mod exposure;
pub mod format;
pub mod params;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::{INVALID_URL_ERROR, ToolsCapability};
pub use definition::{
    CONTEXT_TOOL, EXTRACT_TOOL, SEARCH_TOOL, ToolCall, ToolDefinition, ToolResult, ToolSet,
};
pub use executor::ToolExecutor;
pub use exposure::{MCP_SERVER_NAME, RegisteredTool, ToolHandler, ToolNamespace, direct_tools};
pub use params::{ContextToolParams, ExtractToolParams, SearchToolParams};
