//! Per-provider model allow-lists with default-model fallback.

use tracing::debug;

/// Models accepted for the `openai` provider. The first entry is the default.
const OPENAI_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-4", "gpt-4-turbo"];

/// Models accepted for the `anthropic` provider. The first entry is the default.
const ANTHROPIC_MODELS: &[&str] = &["claude-3-sonnet", "claude-3-opus", "claude-3-haiku"];

/// Models accepted for the `gemini` provider. The first entry is the default.
const GEMINI_MODELS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
];

/// The fixed model allow-lists for each known provider.
///
/// Workflow nodes are free-form about model names; the catalog keeps
/// execution from failing on a typo or a retired model by substituting
/// the provider's default instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCatalog;

impl ModelCatalog {
    /// Return the allow-list for a provider. Unknown providers share the
    /// `openai` list, matching how the registry routes them to a fallback.
    pub fn allowed_models(provider: &str) -> &'static [&'static str] {
        match provider {
            "gemini" => GEMINI_MODELS,
            "anthropic" => ANTHROPIC_MODELS,
            _ => OPENAI_MODELS,
        }
    }

    /// Return the default model for a provider (first allow-list entry).
    pub fn default_model(provider: &str) -> &'static str {
        Self::allowed_models(provider)[0]
    }

    /// Resolve a requested model against the provider's allow-list.
    ///
    /// A missing or non-allow-listed request resolves to the provider's
    /// default model: substitution, never failure.
    pub fn resolve(provider: &str, requested: Option<&str>) -> String {
        let allowed = Self::allowed_models(provider);
        match requested {
            Some(model) if allowed.contains(&model) => model.to_string(),
            Some(model) => {
                debug!(provider, requested = model, "model not in allow-list, using default");
                allowed[0].to_string()
            }
            None => allowed[0].to_string(),
        }
    }
}
