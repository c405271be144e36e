//! Typed parameters for the three tools.
//!
//! Shared by the direct executor (decoded from the model's JSON arguments)
//! and the MCP server (decoded by rmcp, schema generated by `schemars`).

use serde::{Deserialize, Serialize};

use crate::search::{DEFAULT_MAX_RESULTS, SearchDepth};

const fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

/// Parameters for the `search` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct SearchToolParams {
    /// The search query.
    #[cfg_attr(feature = "mcp", schemars(length(max = 1000)))]
    pub query: String,

    /// `"basic"` (fast) or `"advanced"` (deeper, slower). Defaults to basic.
    #[serde(default)]
    pub search_depth: SearchDepth,

    /// Number of results to return, 1 to 20. Defaults to 5.
    #[serde(default = "default_max_results")]
    #[cfg_attr(feature = "mcp", schemars(range(min = 1, max = 20)))]
    pub max_results: u32,
}

impl SearchToolParams {
    /// Parameters with default depth and result count.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_depth: SearchDepth::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Parameters for the `extract` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ExtractToolParams {
    /// Absolute http(s) URLs to extract content from (at most 20 are processed).
    #[cfg_attr(feature = "mcp", schemars(length(min = 1)))]
    pub urls: Vec<String>,
}

/// Parameters for the `context` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ContextToolParams {
    /// The topic to gather context for.
    #[cfg_attr(feature = "mcp", schemars(length(max = 1000)))]
    pub query: String,

    /// Approximate token budget for the returned context. Defaults to 4000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "mcp", schemars(range(min = 1)))]
    pub max_tokens: Option<usize>,
}
