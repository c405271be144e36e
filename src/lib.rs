//! # tavily-tools
//!
//! Tavily web search, page extraction and context building, packaged as
//! tools for LLM agents.
//!
//! One resilient [`TavilyClient`] (validation, error classification,
//! bounded exponential-backoff retries) sits behind a [`ToolsCapability`]
//! that renders every outcome as agent-readable text. The capability is
//! shared by two kinds of host:
//!
//! - a direct function-calling agent that dispatches tool calls through a
//!   [`ToolExecutor`] (`agent` feature);
//! - an MCP server that an external coding CLI reaches as
//!   `mcp__tavily__<tool>` (`mcp` feature).
//!
//! Both hosts return byte-identical text for the same call.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tavily_tools::{SearchService, TavilyClient, ToolsCapability};
//! use tavily_tools::tools::SearchToolParams;
//!
//! # async fn run() -> tavily_tools::Result<()> {
//! let client: Arc<dyn SearchService> = Arc::new(TavilyClient::from_env()?);
//! let tools = ToolsCapability::new(client);
//! let text = tools.search(SearchToolParams::new("rust 2024 edition")).await?;
//! assert!(text.starts_with("Search results for:"));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod error;
pub mod search;
pub mod tools;

#[cfg(feature = "agent")]
pub mod agent;

#[cfg(feature = "mcp")]
pub mod mcp;

// Re-export commonly used types
pub use error::{AgentError, CommandError, Error, Result, ToolError};
pub use search::{
    ApiError, ClientConfig, ErrorKind, ExtractResult, RetryPolicy, SearchDepth, SearchRequest,
    SearchResult, SearchService, TavilyClient,
};
pub use tools::{ToolCall, ToolExecutor, ToolNamespace, ToolResult, ToolSet, ToolsCapability};

#[cfg(feature = "agent")]
pub use agent::{AgentConfig, LlmProvider, ProviderRegistry, ResearchAgent};

#[cfg(feature = "mcp")]
pub use agent::{CoderConfig, CodingAgent};
#[cfg(feature = "mcp")]
pub use mcp::TavilyMcpServer;
