//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};

use crate::search::{DEFAULT_CONTEXT_TOKENS, DEFAULT_MAX_RESULTS, SearchDepth};

/// tavily-tools: Tavily web search for LLM agents.
///
/// Runs the search, extract and context tools directly, answers questions
/// with a function-calling agent, or serves the tools over MCP.
#[derive(Parser, Debug)]
#[command(name = "tavily-tools")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (per-request logging).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the web and print ranked results.
    #[command(after_help = r#"Examples:
  tavily-tools search "rust async runtimes"
  tavily-tools search "CVE-2024-3094 timeline" --depth advanced -n 10
"#)]
    Search {
        /// Search query text.
        query: String,

        /// Search depth: basic or advanced.
        #[arg(short, long, default_value_t = SearchDepth::Basic)]
        depth: SearchDepth,

        /// Maximum number of results (1-20).
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
    },

    /// Extract the full text of web pages.
    #[command(after_help = r#"Examples:
  tavily-tools extract https://docs.rs/tokio https://tokio.rs/blog
"#)]
    Extract {
        /// URLs to extract (at most 20 are fetched per call).
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Build a token-bounded, source-attributed context for a query.
    Context {
        /// Query text.
        query: String,

        /// Token budget for the context.
        #[arg(short, long, default_value_t = DEFAULT_CONTEXT_TOKENS)]
        max_tokens: usize,
    },

    /// Agent workflows that use the tools.
    #[cfg(feature = "agent")]
    #[command(subcommand)]
    Agent(AgentCommands),

    /// Start MCP (Model Context Protocol) server.
    #[cfg(feature = "mcp")]
    #[command(subcommand)]
    Mcp(McpCommands),
}

/// Agent subcommands.
#[cfg(feature = "agent")]
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Answer a question with a function-calling model and the tools.
    ///
    /// Requires an OpenAI-compatible API key (`OPENAI_API_KEY`).
    #[command(after_help = r#"Examples:
  tavily-tools agent ask "What changed in Rust 1.88?"
  tavily-tools agent ask "Summarize today's AI news" --model openai:gpt-4.1
"#)]
    Ask {
        /// The question to answer.
        question: String,

        /// Model spec (`provider:model`).
        #[arg(short, long, env = "TAVILY_AGENT_MODEL")]
        model: Option<String>,

        /// Maximum tool-calling rounds.
        #[arg(long)]
        max_iterations: Option<usize>,
    },

    /// Run a coding CLI with the tools attached over MCP.
    #[cfg(feature = "mcp")]
    #[command(after_help = r#"Examples:
  tavily-tools agent code "Upgrade reqwest and fix the breaking changes"
  tavily-tools agent code "Research the new API, then update src/" --timeout 600
"#)]
    Code {
        /// Prompt handed to the coding CLI.
        prompt: String,

        /// Coding CLI executable.
        #[arg(long, env = "TAVILY_CODER_PROGRAM")]
        program: Option<String>,

        /// Model passed through to the coding CLI.
        #[arg(short, long)]
        model: Option<String>,

        /// Timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// MCP server subcommands.
#[cfg(feature = "mcp")]
#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Start MCP server with stdio transport.
    ///
    /// Reads JSON-RPC messages from stdin, writes responses to stdout.
    #[command(after_help = r#"Examples:
  tavily-tools mcp stdio
  TAVILY_API_KEY=tvly-... tavily-tools mcp stdio
"#)]
    Stdio,

    /// Start MCP server with streamable HTTP transport at `/mcp`.
    #[command(after_help = r#"Examples:
  tavily-tools mcp serve                            # Listen on 127.0.0.1:3000
  tavily-tools mcp serve --host 0.0.0.0 --port 8080
"#)]
    Serve {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to.
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}
