//! Provider-agnostic tool types.
//!
//! [`ToolDefinition`]s are what an LLM sees when deciding to call a tool;
//! [`ToolCall`] and [`ToolResult`] carry one invocation and its outcome
//! through the agent loop.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::search::{MAX_EXTRACT_URLS, MAX_QUERY_CHARS, MAX_RESULTS_LIMIT};

/// Name of the web search tool.
pub const SEARCH_TOOL: &str = "search";
/// Name of the URL extraction tool.
pub const EXTRACT_TOOL: &str = "extract";
/// Name of the RAG context tool.
pub const CONTEXT_TOOL: &str = "context";

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match a registered handler).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// Rendered tool output, or the misuse message when `is_error`.
    pub content: String,
    /// Whether the call was rejected as misuse.
    pub is_error: bool,
}

/// An ordered set of tool definitions offered to a model.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// The search, extract and context tools.
    #[must_use]
    pub fn search_tools() -> Self {
        Self {
            definitions: vec![def_search(), def_extract(), def_context()],
        }
    }

    /// Returns the tool names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }
}

fn def_search() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_TOOL.to_string(),
        description: "Search the web. Returns ranked results with title, URL, relevance \
                      score and a content snippet."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "maxLength": MAX_QUERY_CHARS,
                    "description": "The search query."
                },
                "search_depth": {
                    "type": "string",
                    "enum": ["basic", "advanced"],
                    "description": "'basic' is fast; 'advanced' retrieves deeper content. Defaults to 'basic'.",
                    "default": "basic"
                },
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_RESULTS_LIMIT,
                    "description": "Number of results to return. Defaults to 5.",
                    "default": 5
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}

fn def_extract() -> ToolDefinition {
    ToolDefinition {
        name: EXTRACT_TOOL.to_string(),
        description: "Extract the full text content of web pages. Failed URLs are listed \
                      separately; at most 20 URLs are processed per call."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": format!("Absolute http(s) URLs. Only the first {MAX_EXTRACT_URLS} unique URLs are processed.")
                }
            },
            "required": ["urls"],
            "additionalProperties": false
        }),
    }
}

fn def_context() -> ToolDefinition {
    ToolDefinition {
        name: CONTEXT_TOOL.to_string(),
        description: "Gather search context for a topic as a JSON array of {url, content} \
                      objects, bounded by an approximate token budget. Suited to grounding \
                      an answer in sources."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "maxLength": MAX_QUERY_CHARS,
                    "description": "The topic to gather context for."
                },
                "max_tokens": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Approximate token budget. Defaults to 4000."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}
