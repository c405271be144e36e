//! Error types for tavily-tools.
//!
//! Each layer owns its error enum: [`ApiError`](crate::search::ApiError) for
//! the remote service, [`ToolError`] for tool-level misuse, [`AgentError`]
//! for the hosting agents and [`CommandError`] for the CLI. They all fold
//! into the crate-level [`Error`].

use thiserror::Error;

use crate::search::ApiError;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for tavily-tools.
#[derive(Error, Debug)]
pub enum Error {
    /// Remote service failure.
    #[error("Tavily error: {0}")]
    Api(#[from] ApiError),

    /// Tool was invoked incorrectly.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Hosting agent failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Misuse of a tool by its caller, detected before any network call.
///
/// These surface to agents as error results rather than as rendered
/// service errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Arguments were well-formed but semantically invalid.
    #[error("{tool}: {message}")]
    InvalidInput {
        /// Tool name.
        tool: String,
        /// What was wrong.
        message: String,
    },

    /// Arguments could not be decoded into the tool's parameters.
    #[error("{tool}: invalid arguments: {message}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Decoder message.
        message: String,
    },

    /// No tool with this name is registered.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// Requested name.
        name: String,
    },
}

impl ToolError {
    /// Shorthand for [`ToolError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

/// Errors from the hosting agents and their LLM providers.
#[derive(Error, Debug)]
pub enum AgentError {
    /// No API key for the selected LLM provider.
    #[error("API key not set for provider '{provider}'")]
    ApiKeyMissing {
        /// Provider scheme.
        provider: String,
    },

    /// LLM provider call failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Provider message.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// The model kept requesting tools past the iteration limit.
    #[error("tool loop exceeded {max_iterations} iterations")]
    ToolLoopExceeded {
        /// Configured limit.
        max_iterations: usize,
    },

    /// No provider registered under this scheme.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Requested scheme.
        name: String,
    },

    /// Model spec was not of the form `provider:model`.
    #[error("invalid model spec '{spec}': expected 'provider:model'")]
    InvalidModelSpec {
        /// Offending spec.
        spec: String,
    },

    /// Provider response could not be interpreted.
    #[error("failed to parse response: {message}")]
    ResponseParse {
        /// Parse failure detail.
        message: String,
    },

    /// The coding CLI exited unsuccessfully.
    #[error("'{program}' exited with {}: {stderr}", status.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    Subprocess {
        /// Program name.
        program: String,
        /// Exit code, `None` if killed by a signal.
        status: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The coding CLI did not finish in time.
    #[error("'{program}' timed out after {seconds}s")]
    Timeout {
        /// Program name.
        program: String,
        /// Configured limit.
        seconds: u64,
    },

    /// Local tool endpoint could not be started.
    #[error("tool server error: {message}")]
    ToolServer {
        /// Failure detail.
        message: String,
    },
}

/// CLI command errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command failed: {0}")]
    ExecutionFailed(String),
}
