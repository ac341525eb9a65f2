//! Registry lookup and mock provider behavior.

use flowstack_model::{GenerationProvider, MockProvider, ProviderRegistry};

#[tokio::test]
async fn known_providers_resolve_by_name() {
    let registry = ProviderRegistry::with_defaults();
    assert_eq!(registry.get("openai").name(), "openai");
    assert_eq!(registry.get("anthropic").name(), "anthropic");
    assert_eq!(registry.get("gemini").name(), "gemini");
}

#[tokio::test]
async fn unknown_provider_falls_back_to_mock() {
    let registry = ProviderRegistry::with_defaults();
    assert_eq!(registry.get("watsonx").name(), "mock");
}

#[tokio::test]
async fn mock_only_registry_never_builds_network_clients() {
    let registry = ProviderRegistry::mock_only();
    assert_eq!(registry.get("openai").name(), "mock");
    assert_eq!(registry.get("gemini").name(), "mock");
}

#[tokio::test]
async fn mock_provider_echoes_the_prompt() {
    let provider = MockProvider;
    let response = provider.generate("what is up?", "gpt-4", "sk-unused").await.unwrap();
    assert_eq!(response, "[mock:gpt-4] what is up?");
}

#[tokio::test]
async fn registered_provider_replaces_previous_entry() {
    let mut registry = ProviderRegistry::mock_only();
    registry.register(std::sync::Arc::new(MockProvider));
    assert_eq!(registry.get("mock").name(), "mock");
}
