//! Workflow execution engine.
//!
//! [`ExecutionEngine::execute`] resolves a graph to its active path and
//! performs the action the upstream node type selects: echo for
//! `userQuery`, top-k retrieval for `knowledgeBase`, and
//! retrieve-then-generate for `llmEngine`. The engine is infallible at
//! its boundary: every internal error is folded into a structured
//! [`ExecutionResult`] with `success == false`; callers decide what that
//! means for their transport.

use std::sync::Arc;
use std::time::Instant;

use flowstack_model::{ModelCatalog, ProviderRegistry, WebSearchProvider, WebSearchResult};
use flowstack_rag::{RagConfig, WorkspaceIndex};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::context::gather_workspace_context;
use crate::error::{GraphError, Result};
use crate::registry::DocumentRegistry;
use crate::resolver::{ResolvedPath, resolve};
use crate::schema::{LlmEngineConfig, NodeKind, WorkflowGraph};

/// Response body when a knowledge-base search finds nothing.
const NO_MATCHING_CONTEXT: &str = "No matching context found.";

/// Separator between retrieved texts in a retrieval-only response.
const CONTEXT_SEPARATOR: &str = "\n---\n";

/// How many web search results are appended to the prompt.
const WEB_SEARCH_RESULTS: usize = 5;

/// The structured outcome of one workflow execution.
///
/// Produced once per [`ExecutionEngine::execute`] call; never persisted by
/// the engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the execution produced a response.
    pub success: bool,
    /// The response body, when `success` is true.
    pub response: Option<String>,
    /// The failure description, when `success` is false.
    pub error: Option<String>,
    /// The retrieved/external texts that informed the response.
    pub context_used: Vec<String>,
    /// Whether web search results were included in the prompt.
    pub web_search_used: bool,
    /// The provider that served the request (`user`, `knowledge-base`, or
    /// a generation provider name).
    pub provider_used: String,
    /// The model that served the request.
    pub model_used: String,
    /// Whether a generation API key was configured on the node.
    pub api_key_provided: bool,
    /// Wall-clock duration of the execution, in seconds.
    pub processing_time_seconds: f64,
}

impl ExecutionResult {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
            context_used: Vec::new(),
            web_search_used: false,
            provider_used: String::new(),
            model_used: String::new(),
            api_key_provided: false,
            processing_time_seconds: 0.0,
        }
    }
}

/// The workflow execution engine.
///
/// Construct one via [`ExecutionEngine::builder()`]. Holds no per-call
/// state: each execution resolves, retrieves, and generates within the
/// caller's task.
pub struct ExecutionEngine {
    config: RagConfig,
    index: Arc<WorkspaceIndex>,
    registry: Arc<dyn DocumentRegistry>,
    providers: ProviderRegistry,
    web_search: Arc<dyn WebSearchProvider>,
}

impl ExecutionEngine {
    /// Create a new [`ExecutionEngineBuilder`].
    pub fn builder() -> ExecutionEngineBuilder {
        ExecutionEngineBuilder::default()
    }

    /// Execute a workflow graph against a query within a workspace.
    ///
    /// Never returns an error and never panics across the boundary: graph
    /// misconfiguration, storage failures, and provider failures all
    /// surface as a structured result with `success == false` (and
    /// provider/web-search degradations keep `success == true` with a
    /// labeled response, matching the degradation policy).
    pub async fn execute(
        &self,
        graph: &WorkflowGraph,
        workspace_id: &str,
        query: &str,
    ) -> ExecutionResult {
        let started = Instant::now();
        match self.try_execute(graph, workspace_id, query, started).await {
            Ok(result) => result,
            Err(e) => {
                error!(workspace = workspace_id, error = %e, "workflow execution failed");
                ExecutionResult::failure(e.to_string())
            }
        }
    }

    async fn try_execute(
        &self,
        graph: &WorkflowGraph,
        workspace_id: &str,
        query: &str,
        started: Instant,
    ) -> Result<ExecutionResult> {
        let resolved = resolve(graph)?;

        match &resolved.source.kind {
            NodeKind::UserQuery => {
                info!(workspace = workspace_id, "executing echo path");
                Ok(ExecutionResult {
                    success: true,
                    response: Some(query.to_string()),
                    error: None,
                    context_used: Vec::new(),
                    web_search_used: false,
                    provider_used: "user".to_string(),
                    model_used: "user-query".to_string(),
                    api_key_provided: false,
                    processing_time_seconds: started.elapsed().as_secs_f64(),
                })
            }

            NodeKind::KnowledgeBase => {
                info!(workspace = workspace_id, "executing retrieval-only path");
                let results = self.index.search(workspace_id, query, self.config.top_k).await?;
                let documents: Vec<String> = results.into_iter().map(|r| r.text).collect();
                let response = if documents.is_empty() {
                    NO_MATCHING_CONTEXT.to_string()
                } else {
                    documents.join(CONTEXT_SEPARATOR)
                };
                Ok(ExecutionResult {
                    success: true,
                    response: Some(response),
                    error: None,
                    context_used: documents,
                    web_search_used: false,
                    provider_used: "knowledge-base".to_string(),
                    model_used: "kb-search".to_string(),
                    api_key_provided: false,
                    processing_time_seconds: started.elapsed().as_secs_f64(),
                })
            }

            NodeKind::LlmEngine(config) => {
                self.execute_generation(&resolved, config, workspace_id, query, started).await
            }

            NodeKind::Output => Err(GraphError::UnsupportedSourceType(
                resolved.source.kind.type_name().to_string(),
            )),
        }
    }

    /// The retrieve-and-generate path.
    async fn execute_generation(
        &self,
        resolved: &ResolvedPath<'_>,
        config: &LlmEngineConfig,
        workspace_id: &str,
        query: &str,
        started: Instant,
    ) -> Result<ExecutionResult> {
        info!(workspace = workspace_id, provider = %config.provider, "executing generation path");

        let has_knowledge_base = resolved
            .upstream_of_source
            .iter()
            .any(|n| matches!(n.kind, NodeKind::KnowledgeBase));
        let context = if has_knowledge_base {
            gather_workspace_context(&self.index, self.registry.as_ref(), workspace_id).await
        } else {
            Vec::new()
        };

        let model = ModelCatalog::resolve(&config.provider, config.model.as_deref());

        let web_results = self.run_web_search(config, query).await;

        let prompt = assemble_prompt(&context, &web_results, config.instructions.as_deref(), query);

        let api_key = config.api_key.as_deref().filter(|k| !k.is_empty());
        let response = match api_key {
            Some(key) => {
                let provider = self.providers.get(&config.provider);
                match provider.generate(&prompt, &model, key).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(provider = %config.provider, error = %e, "generation degraded");
                        format!("Error calling {} API: {e}", config.provider)
                    }
                }
            }
            None => format!(
                "This is a mock response to: {query}\n\n\
                 Context provided: {} documents\n\n\
                 Web search results: {} results\n\n\
                 (No API key provided - using mock mode)",
                context.len(),
                web_results.len()
            ),
        };

        Ok(ExecutionResult {
            success: true,
            response: Some(response),
            error: None,
            context_used: context,
            web_search_used: !web_results.is_empty(),
            provider_used: config.provider.clone(),
            model_used: model,
            api_key_provided: api_key.is_some(),
            processing_time_seconds: started.elapsed().as_secs_f64(),
        })
    }

    /// Run web search when the node enables it and carries a key.
    ///
    /// Failures and timeouts are zero results, never execution failures.
    async fn run_web_search(&self, config: &LlmEngineConfig, query: &str) -> Vec<WebSearchResult> {
        if !config.use_web_search {
            return Vec::new();
        }
        let Some(key) = config.serp_api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Vec::new();
        };
        match self.web_search.search(query, key, WEB_SEARCH_RESULTS).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "web search degraded to zero results");
                Vec::new()
            }
        }
    }
}

/// Assemble the structured prompt: knowledge-base block, web-search
/// block, custom instructions, then the literal question.
fn assemble_prompt(
    context: &[String],
    web_results: &[WebSearchResult],
    instructions: Option<&str>,
    query: &str,
) -> String {
    let mut prompt = String::new();

    if !context.is_empty() {
        prompt.push_str("Context from Knowledge Base:\n");
        prompt.push_str(&context.join("\n"));
        prompt.push_str("\n\n");
    }

    if !web_results.is_empty() {
        prompt.push_str("Web Search Results:\n");
        for result in web_results {
            prompt.push_str(&format!(
                "Title: {}\nSnippet: {}\nURL: {}\n",
                result.title, result.snippet, result.url
            ));
        }
        prompt.push('\n');
    }

    if let Some(instructions) = instructions.filter(|i| !i.is_empty()) {
        prompt.push_str("Instructions:\n");
        prompt.push_str(instructions);
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!("Question: {query}\n\nAnswer:"));
    prompt
}

/// Builder for constructing an [`ExecutionEngine`].
///
/// All components except `config` are required; the configuration
/// defaults to [`RagConfig::default()`] (top-5 retrieval).
#[derive(Default)]
pub struct ExecutionEngineBuilder {
    config: Option<RagConfig>,
    index: Option<Arc<WorkspaceIndex>>,
    registry: Option<Arc<dyn DocumentRegistry>>,
    providers: Option<ProviderRegistry>,
    web_search: Option<Arc<dyn WebSearchProvider>>,
}

impl ExecutionEngineBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the workspace index to retrieve from.
    pub fn index(mut self, index: Arc<WorkspaceIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the document registry used for context matching.
    pub fn registry(mut self, registry: Arc<dyn DocumentRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the generation provider registry.
    pub fn providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Set the web search provider.
    pub fn web_search(mut self, web_search: Arc<dyn WebSearchProvider>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    /// Build the [`ExecutionEngine`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MalformedGraph`] if any required field is
    /// missing.
    pub fn build(self) -> Result<ExecutionEngine> {
        let config = self.config.unwrap_or_default();
        let index = self
            .index
            .ok_or_else(|| GraphError::MalformedGraph("index is required".to_string()))?;
        let registry = self
            .registry
            .ok_or_else(|| GraphError::MalformedGraph("registry is required".to_string()))?;
        let providers = self
            .providers
            .ok_or_else(|| GraphError::MalformedGraph("providers is required".to_string()))?;
        let web_search = self
            .web_search
            .ok_or_else(|| GraphError::MalformedGraph("web_search is required".to_string()))?;
        Ok(ExecutionEngine { config, index, registry, providers, web_search })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_orders_context_before_web_before_question() {
        let context = vec!["kb text".to_string()];
        let web = vec![WebSearchResult {
            title: "T".to_string(),
            snippet: "S".to_string(),
            url: "http://u".to_string(),
        }];
        let prompt = assemble_prompt(&context, &web, Some("be brief"), "why?");

        let kb = prompt.find("Context from Knowledge Base:").unwrap();
        let ws = prompt.find("Web Search Results:").unwrap();
        let inst = prompt.find("Instructions:").unwrap();
        let q = prompt.find("Question: why?").unwrap();
        assert!(kb < ws && ws < inst && inst < q);
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn prompt_without_context_is_just_the_question() {
        let prompt = assemble_prompt(&[], &[], None, "hello");
        assert_eq!(prompt, "Question: hello\n\nAnswer:");
    }
}
