//! Hosting agents for the search tools.
//!
//! Two hosts share one [`ToolsCapability`](crate::tools::ToolsCapability):
//!
//! ```text
//! ResearchAgent (direct)                 CodingAgent (subprocess, `mcp`)
//!   ├── LlmProvider via ProviderRegistry   ├── in-process MCP server (loopback)
//!   └── agentic loop → ToolExecutor        └── coding CLI → mcp__tavily__*
//!              \                               /
//!               └──── Arc<ToolsCapability> ───┘
//! ```
//!
//! # Feature Gate
//!
//! This module requires the `agent` feature flag; [`CodingAgent`] also
//! needs `mcp`:
//! ```toml
//! [dependencies]
//! tavily-tools = { version = "...", features = ["agent"] }
//! ```

pub mod agentic_loop;
#[cfg(feature = "mcp")]
pub mod coder;
pub mod config;
pub mod direct;
pub mod message;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod traits;

// Re-export key types
#[cfg(feature = "mcp")]
pub use coder::{CoderConfig, CodingAgent};
pub use config::AgentConfig;
pub use direct::ResearchAgent;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use provider::LlmProvider;
pub use registry::{ModelSpec, ProviderFactory, ProviderRegistry};
pub use traits::{Agent, AgentResponse, execute_with_tools};
