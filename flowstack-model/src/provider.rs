//! Generation provider trait and the name-keyed provider registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::anthropic::AnthropicProvider;
use crate::error::Result;
use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;

/// A text generation backend reached through a narrow call interface.
///
/// Implementations wrap one hosted API each. The caller supplies the
/// model name and API key per call, because both come from the workflow's
/// node configuration rather than from process-level configuration.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// The provider name this implementation serves (e.g. `"openai"`).
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` using `model`.
    async fn generate(&self, prompt: &str, model: &str, api_key: &str) -> Result<String>;
}

/// A registry mapping provider names to implementations.
///
/// Unknown provider names resolve to the mock provider, which echoes the
/// prompt: execution degrades rather than fails when a workflow names a
/// provider this build does not ship.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn GenerationProvider>>,
    fallback: Arc<dyn GenerationProvider>,
}

impl ProviderRegistry {
    /// Create a registry with the built-in providers registered:
    /// `openai`, `anthropic`, `gemini`, and the mock fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
            fallback: Arc::new(MockProvider::default()),
        };
        registry.register(Arc::new(OpenAiProvider::new()));
        registry.register(Arc::new(AnthropicProvider::new()));
        registry.register(Arc::new(GeminiProvider::new()));
        registry
    }

    /// Create an empty registry with only the mock fallback.
    ///
    /// Useful in tests, where every provider name should resolve to the
    /// mock echo instead of a network client.
    pub fn mock_only() -> Self {
        Self { providers: HashMap::new(), fallback: Arc::new(MockProvider::default()) }
    }

    /// Register a provider under its own name, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Resolve a provider by name, falling back to the mock provider.
    pub fn get(&self, name: &str) -> Arc<dyn GenerationProvider> {
        self.providers.get(name).cloned().unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
