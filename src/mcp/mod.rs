//! MCP (Model Context Protocol) server for tavily-tools.
//!
//! Exposes the search, extract and context tools to MCP clients such as
//! coding CLIs, over stdio or streamable HTTP.
//!
//! # Feature Gate
//!
//! This module requires the `mcp` feature flag:
//! ```toml
//! [dependencies]
//! tavily-tools = { version = "...", features = ["mcp"] }
//! ```
//!
//! # Architecture
//!
//! ```text
//! MCP client (coding CLI)
//!   ↓ mcp__tavily__search { query, ... }
//! TavilyMcpServer (one per session, built by a factory closure)
//!   ↓ Arc<ToolsCapability>
//! TavilyClient → Tavily API
//!   ↓
//! rendered text → MCP client
//! ```

pub mod server;
pub mod transport;

pub use server::TavilyMcpServer;
pub use transport::{LocalEndpoint, MCP_PATH, serve_http, serve_stdio, spawn_local};
