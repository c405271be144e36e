//! CLI layer for tavily-tools.
//!
//! Provides the command-line interface using clap, with commands for
//! running the tools, the agents and the MCP server.

pub mod commands;
pub mod parser;

pub use commands::execute;
#[cfg(feature = "agent")]
pub use parser::AgentCommands;
#[cfg(feature = "mcp")]
pub use parser::McpCommands;
pub use parser::{Cli, Commands};
