//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use crate::error::AgentError;

use super::registry::ModelSpec;

/// Default model spec for the research agent.
pub const DEFAULT_MODEL: &str = "openai:gpt-4o-mini";
/// Default maximum tool-calling loop iterations.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 8;
/// Default completion budget.
const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Configuration for the direct function-calling agent.
#[derive(Clone)]
pub struct AgentConfig {
    /// Provider scheme and model name.
    pub model: ModelSpec,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Maximum tool-calling loop iterations before aborting.
    pub max_tool_iterations: usize,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("max_tool_iterations", &self.max_tool_iterations)
            .finish()
    }
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// [`AgentError::InvalidModelSpec`] for a malformed `TAVILY_AGENT_MODEL`,
    /// [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    max_tokens: Option<u32>,
    max_tool_iterations: Option<usize>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.model.is_none() {
            self.model = std::env::var("TAVILY_AGENT_MODEL").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL").ok();
        }
        if self.max_tool_iterations.is_none() {
            self.max_tool_iterations = std::env::var("TAVILY_AGENT_MAX_TOOL_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the model spec (`provider:model`).
    #[must_use]
    pub fn model(mut self, spec: impl Into<String>) -> Self {
        self.model = Some(spec.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the completion budget.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the maximum tool-calling loop iterations.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// [`AgentError::InvalidModelSpec`] for a malformed model spec,
    /// [`AgentError::ApiKeyMissing`] if no non-empty API key was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let model: ModelSpec = self.model.as_deref().unwrap_or(DEFAULT_MODEL).parse()?;
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::ApiKeyMissing {
                provider: model.provider.clone(),
            })?;

        Ok(AgentConfig {
            model,
            api_key,
            base_url: self.base_url.filter(|u| !u.trim().is_empty()),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            max_tool_iterations: self
                .max_tool_iterations
                .unwrap_or(DEFAULT_MAX_TOOL_ITERATIONS),
        })
    }
}
