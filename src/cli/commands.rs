//! CLI command implementations.
//!
//! Every command builds one [`TavilyClient`] from the environment, wraps it
//! in a shared [`ToolsCapability`] and hands that to whichever host runs.

use std::sync::Arc;

#[cfg(feature = "agent")]
use crate::cli::parser::AgentCommands;
#[cfg(feature = "mcp")]
use crate::cli::parser::McpCommands;
use crate::cli::parser::{Cli, Commands};
use crate::error::{CommandError, Result};
use crate::search::{ClientConfig, SearchDepth, SearchService, TavilyClient};
use crate::tools::{ContextToolParams, ExtractToolParams, SearchToolParams, ToolsCapability};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success. Server commands return an empty
/// string once the server stops.
///
/// # Errors
///
/// Returns an error if the client cannot be configured or the command fails.
pub fn execute(cli: &Cli) -> Result<String> {
    let capability = capability(cli.verbose)?;
    let rt = runtime()?;

    match &cli.command {
        Commands::Search {
            query,
            depth,
            max_results,
        } => rt.block_on(cmd_search(&capability, query, *depth, *max_results)),
        Commands::Extract { urls } => rt.block_on(cmd_extract(&capability, urls)),
        Commands::Context { query, max_tokens } => {
            rt.block_on(cmd_context(&capability, query, *max_tokens))
        }

        // ── Agent subcommands ───────────────────────────────────
        #[cfg(feature = "agent")]
        Commands::Agent(sub) => rt.block_on(execute_agent(sub, capability)),

        // ── MCP server ───────────────────────────────────────────
        #[cfg(feature = "mcp")]
        Commands::Mcp(sub) => rt.block_on(cmd_mcp(sub, capability)),
    }
}

/// Builds the shared capability over a client configured from the
/// environment. Fails before any network call when the key is missing.
fn capability(verbose: bool) -> Result<Arc<ToolsCapability>> {
    let config = ClientConfig::builder().from_env().verbose(verbose).build()?;
    let client: Arc<dyn SearchService> = Arc::new(TavilyClient::new(config)?);
    Ok(Arc::new(ToolsCapability::new(client)))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

async fn cmd_search(
    capability: &ToolsCapability,
    query: &str,
    depth: SearchDepth,
    max_results: u32,
) -> Result<String> {
    let params = SearchToolParams {
        query: query.to_string(),
        search_depth: depth,
        max_results,
    };
    Ok(capability.search(params).await?)
}

async fn cmd_extract(capability: &ToolsCapability, urls: &[String]) -> Result<String> {
    let params = ExtractToolParams {
        urls: urls.to_vec(),
    };
    Ok(capability.extract(params).await?)
}

async fn cmd_context(
    capability: &ToolsCapability,
    query: &str,
    max_tokens: usize,
) -> Result<String> {
    if max_tokens == 0 {
        return Err(CommandError::InvalidArgument("--max-tokens must be positive".to_string()).into());
    }
    let params = ContextToolParams {
        query: query.to_string(),
        max_tokens: Some(max_tokens),
    };
    Ok(capability.context(params).await?)
}

#[cfg(feature = "agent")]
async fn execute_agent(sub: &AgentCommands, capability: Arc<ToolsCapability>) -> Result<String> {
    match sub {
        AgentCommands::Ask {
            question,
            model,
            max_iterations,
        } => cmd_ask(capability, question, model.as_deref(), *max_iterations).await,
        #[cfg(feature = "mcp")]
        AgentCommands::Code {
            prompt,
            program,
            model,
            timeout,
        } => {
            let mut config = crate::agent::CoderConfig::from_env();
            if let Some(program) = program {
                config.program.clone_from(program);
            }
            if let Some(secs) = timeout {
                config.timeout = std::time::Duration::from_secs(*secs);
            }
            config.model.clone_from(model);
            let agent = crate::agent::CodingAgent::new(config, capability);
            Ok(agent.run(prompt).await?)
        }
    }
}

#[cfg(feature = "agent")]
async fn cmd_ask(
    capability: Arc<ToolsCapability>,
    question: &str,
    model: Option<&str>,
    max_iterations: Option<usize>,
) -> Result<String> {
    use crate::agent::{AgentConfig, ProviderRegistry, ResearchAgent};

    let mut builder = AgentConfig::builder().from_env();
    if let Some(model) = model {
        builder = builder.model(model);
    }
    if let Some(n) = max_iterations {
        builder = builder.max_tool_iterations(n);
    }
    let config = builder.build()?;

    let provider = ProviderRegistry::with_defaults().create(&config)?;
    let agent = ResearchAgent::new(&config, capability);
    let response = agent.ask(provider.as_ref(), question).await?;
    Ok(response.content)
}

/// Starts the MCP server with the specified transport.
///
/// Runs until the client disconnects (stdio) or the server is stopped
/// (HTTP).
#[cfg(feature = "mcp")]
async fn cmd_mcp(cmd: &McpCommands, capability: Arc<ToolsCapability>) -> Result<String> {
    use crate::mcp::{serve_http, serve_stdio};

    match cmd {
        McpCommands::Stdio => serve_stdio(capability).await,
        McpCommands::Serve { host, port } => serve_http(capability, host, *port).await,
    }
    .map_err(|e| CommandError::ExecutionFailed(format!("MCP server error: {e}")))?;

    Ok(String::new())
}
