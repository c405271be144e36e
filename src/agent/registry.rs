//! Provider registry.
//!
//! Providers are looked up by the scheme of a `provider:model` spec in a
//! table of factories filled at startup. Adding a backend means registering
//! one more factory; nothing is patched at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;

use super::config::AgentConfig;
use super::provider::LlmProvider;
use super::providers::OpenAiProvider;

/// Scheme assumed when a spec has no `provider:` prefix.
pub const DEFAULT_PROVIDER: &str = "openai";

/// A parsed `provider:model` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Provider scheme used for registry lookup.
    pub provider: String,
    /// Model name passed to the provider.
    pub model: String,
}

impl std::str::FromStr for ModelSpec {
    type Err = AgentError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || AgentError::InvalidModelSpec {
            spec: spec.to_string(),
        };
        let (provider, model) = spec
            .trim()
            .split_once(':')
            .unwrap_or((DEFAULT_PROVIDER, spec.trim()));
        let (provider, model) = (provider.trim(), model.trim());
        if provider.is_empty() || model.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            provider: provider.to_lowercase(),
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

/// Builds a provider from configuration.
pub type ProviderFactory =
    Box<dyn Fn(&AgentConfig) -> Result<Arc<dyn LlmProvider>, AgentError> + Send + Sync>;

/// Scheme → factory table.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

impl ProviderRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in providers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            "openai",
            Box::new(|config| Ok(Arc::new(OpenAiProvider::new(config)) as Arc<dyn LlmProvider>)),
        );
        registry
    }

    /// Registers (or replaces) the factory for `scheme`.
    pub fn register(&mut self, scheme: impl Into<String>, factory: ProviderFactory) {
        self.factories.insert(scheme.into().to_lowercase(), factory);
    }

    /// Registered schemes, sorted.
    #[must_use]
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Creates the provider for `config.model`.
    ///
    /// # Errors
    ///
    /// [`AgentError::UnsupportedProvider`] for an unregistered scheme, or
    /// whatever the factory reports.
    pub fn create(&self, config: &AgentConfig) -> Result<Arc<dyn LlmProvider>, AgentError> {
        let factory = self.factories.get(&config.model.provider).ok_or_else(|| {
            AgentError::UnsupportedProvider {
                name: config.model.provider.clone(),
            }
        })?;
        factory(config)
    }
}
