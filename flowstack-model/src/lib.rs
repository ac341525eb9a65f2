//! # flowstack-model
//!
//! Generation provider and web search integrations for Flowstack.
//!
//! ## Overview
//!
//! Workflow nodes carry their own provider name, model name, and API key;
//! this crate turns that configuration into calls against hosted APIs:
//!
//! - [`GenerationProvider`] — narrow `generate(prompt, model, api_key)`
//!   seam, implemented for OpenAI, Anthropic, and Gemini, plus a
//!   [`MockProvider`] echo used for unknown provider names and in tests
//! - [`ProviderRegistry`] — name-keyed lookup with mock fallback
//! - [`ModelCatalog`] — fixed per-provider model allow-lists; unknown
//!   models substitute the provider default instead of failing
//! - [`WebSearchProvider`] / [`SerpApiClient`] — bounded-timeout external
//!   search feeding optional context into generation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowstack_model::{ModelCatalog, ProviderRegistry};
//!
//! let registry = ProviderRegistry::with_defaults();
//! let model = ModelCatalog::resolve("openai", Some("gpt-4"));
//! let provider = registry.get("openai");
//! let answer = provider.generate("What is Rust?", &model, &api_key).await?;
//! ```

pub mod anthropic;
pub mod catalog;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod websearch;

pub use anthropic::AnthropicProvider;
pub use catalog::ModelCatalog;
pub use error::{ModelError, Result};
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
pub use provider::{GenerationProvider, ProviderRegistry};
pub use websearch::{SerpApiClient, WebSearchProvider, WebSearchResult};
