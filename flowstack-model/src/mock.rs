//! Mock generation provider for tests and unknown provider names.

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::GenerationProvider;

/// A deterministic echo provider.
///
/// Returns the full prompt prefixed with the model name, so tests can
/// assert on exactly what context reached the generation call without
/// any network traffic.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

#[async_trait]
impl GenerationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, model: &str, _api_key: &str) -> Result<String> {
        Ok(format!("[mock:{model}] {prompt}"))
    }
}
