//! Provider registry: explicit, owned mapping from provider ids to adapters

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::{
    AnthropicAdapter, GoogleAdapter, OpenAiAdapter, OpenAiCompatAdapter, ProviderAdapter, ProviderConfig,
    ProviderKind,
};
use crate::error::LlmError;

/// Registry of configured providers.
///
/// Built once at startup and passed by reference; there is no global
/// instance. Lookups by unregistered id fail with
/// [`LlmError::UnknownProvider`] rather than falling back to a default.
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own id, replacing any previous entry
    #[must_use]
    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.id().to_owned(), adapter);
        self
    }

    /// Build a registry from per-provider configuration, keyed by provider id
    pub fn from_config(providers: &HashMap<String, ProviderConfig>) -> Result<Self, LlmError> {
        let mut registry = Self::new();
        for (id, config) in providers {
            let adapter: Arc<dyn ProviderAdapter> = match config.kind {
                ProviderKind::OpenAi => Arc::new(OpenAiAdapter::with_id(id.clone(), config)),
                ProviderKind::Anthropic => Arc::new(AnthropicAdapter::from_config(config)),
                ProviderKind::Google => Arc::new(GoogleAdapter::from_config(config)),
                ProviderKind::OpenAiCompat => Arc::new(OpenAiCompatAdapter::new(id.clone(), config)?),
            };
            registry.adapters.insert(id.clone(), adapter);
        }
        Ok(registry)
    }

    /// Look up an adapter by provider id
    pub fn get(&self, provider: &str) -> Result<&Arc<dyn ProviderAdapter>, LlmError> {
        self.adapters
            .get(provider)
            .ok_or_else(|| LlmError::UnknownProvider(provider.to_owned()))
    }

    /// Registered provider ids, in no particular order
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }

    /// Number of registered providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no providers are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
