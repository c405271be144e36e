//! Subprocess coding agent.
//!
//! Starts the MCP server on a loopback port, hands its address to an
//! external coding CLI through `--mcp-config`, and returns what the CLI
//! prints. The CLI only sees the namespaced tools it is allowed to call.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::AgentError;
use crate::mcp::spawn_local;
use crate::tools::{ToolNamespace, ToolsCapability};

/// CLI launched when none is configured.
pub const DEFAULT_PROGRAM: &str = "claude";
/// Wall-clock limit for one run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How to launch the coding CLI.
#[derive(Debug, Clone)]
pub struct CoderConfig {
    /// Executable name or path.
    pub program: String,
    /// Kill the CLI after this long.
    pub timeout: Duration,
    /// Optional `--model` passed through.
    pub model: Option<String>,
    /// Extra arguments appended verbatim.
    pub extra_args: Vec<String>,
    /// Working directory for the CLI; inherits ours when unset.
    pub working_dir: Option<PathBuf>,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            timeout: DEFAULT_TIMEOUT,
            model: None,
            extra_args: Vec::new(),
            working_dir: None,
        }
    }
}

impl CoderConfig {
    /// Defaults overridden by `TAVILY_CODER_PROGRAM` and
    /// `TAVILY_CODER_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(program) = std::env::var("TAVILY_CODER_PROGRAM")
            && !program.trim().is_empty()
        {
            config.program = program;
        }
        if let Some(secs) = std::env::var("TAVILY_CODER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

/// Drives an external coding CLI that reaches the tools over MCP.
#[derive(Debug, Clone)]
pub struct CodingAgent {
    config: CoderConfig,
    capability: Arc<ToolsCapability>,
    namespace: ToolNamespace,
}

impl CodingAgent {
    /// Creates the agent; the capability is shared with the MCP server.
    #[must_use]
    pub fn new(config: CoderConfig, capability: Arc<ToolsCapability>) -> Self {
        Self {
            config,
            capability,
            namespace: ToolNamespace::default(),
        }
    }

    /// `--mcp-config` payload pointing the CLI at `url`.
    #[must_use]
    pub fn mcp_config(&self, url: &str) -> String {
        json!({
            "mcpServers": {
                self.namespace.server(): { "type": "http", "url": url }
            }
        })
        .to_string()
    }

    /// Namespaced tool names the CLI may call.
    #[must_use]
    pub fn allowed_tools(&self) -> Vec<String> {
        self.namespace
            .allowed_tools(&self.capability.definitions())
    }

    /// Full argument list for one run.
    #[must_use]
    pub fn command_args(&self, prompt: &str, mcp_config: &str) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            prompt.to_string(),
            "--output-format".to_string(),
            "text".to_string(),
            "--mcp-config".to_string(),
            mcp_config.to_string(),
            "--allowedTools".to_string(),
            self.allowed_tools().join(","),
        ];
        if let Some(ref model) = self.config.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args
    }

    /// Runs the CLI on `prompt` and returns its trimmed stdout.
    ///
    /// The MCP server lives exactly as long as the run.
    ///
    /// # Errors
    ///
    /// [`AgentError::ToolServer`] if the server cannot start,
    /// [`AgentError::Subprocess`] on spawn failure or non-zero exit,
    /// [`AgentError::Timeout`] if the CLI outlives the limit.
    pub async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        let endpoint = spawn_local(Arc::clone(&self.capability))
            .await
            .map_err(|e| AgentError::ToolServer {
                message: e.to_string(),
            })?;
        let url = endpoint.url();
        info!(program = %self.config.program, %url, "starting coding agent");

        let result = self.run_cli(prompt, &self.mcp_config(&url)).await;
        endpoint.shutdown().await;
        result
    }

    async fn run_cli(&self, prompt: &str, mcp_config: &str) -> Result<String, AgentError> {
        let program = self.config.program.clone();
        let mut command = Command::new(&program);
        command
            .args(self.command_args(prompt, mcp_config))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.config.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|e| AgentError::Subprocess {
            program: program.clone(),
            status: None,
            stderr: e.to_string(),
        })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| AgentError::Timeout {
                program: program.clone(),
                seconds: self.config.timeout.as_secs(),
            })?
            .map_err(|e| AgentError::Subprocess {
                program: program.clone(),
                status: None,
                stderr: e.to_string(),
            })?;

        debug!(
            %program,
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            "coding agent exited"
        );

        if !output.status.success() {
            return Err(AgentError::Subprocess {
                program,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
