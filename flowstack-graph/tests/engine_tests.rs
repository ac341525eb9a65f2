//! End-to-end execution tests over the in-memory store and mock provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use flowstack_graph::{
    DocumentRegistry, ExecutionEngine, GraphEdge, GraphNode, InMemoryDocumentRegistry,
    LlmEngineConfig, NodeKind, WorkflowGraph,
};
use flowstack_model::{
    ModelError, ProviderRegistry, WebSearchProvider, WebSearchResult,
};
use flowstack_rag::{
    EmbeddingProvider, HashingEmbedder, InMemoryVectorStore, META_FILENAME, META_WORKSPACE_ID,
    WorkspaceIndex,
};

/// Web search stub returning a fixed result list.
struct StubWebSearch(Vec<WebSearchResult>);

#[async_trait]
impl WebSearchProvider for StubWebSearch {
    async fn search(
        &self,
        _query: &str,
        _api_key: &str,
        _max_results: usize,
    ) -> flowstack_model::Result<Vec<WebSearchResult>> {
        Ok(self.0.clone())
    }
}

/// Web search stub that always fails.
struct FailingWebSearch;

#[async_trait]
impl WebSearchProvider for FailingWebSearch {
    async fn search(
        &self,
        _query: &str,
        _api_key: &str,
        _max_results: usize,
    ) -> flowstack_model::Result<Vec<WebSearchResult>> {
        Err(ModelError::WebSearch { message: "simulated outage".to_string() })
    }
}

struct Fixture {
    index: Arc<WorkspaceIndex>,
    registry: Arc<InMemoryDocumentRegistry>,
}

impl Fixture {
    fn new() -> Self {
        let embedder = Arc::new(HashingEmbedder::default());
        let index =
            Arc::new(WorkspaceIndex::new(embedder, Arc::new(InMemoryVectorStore::new())));
        Self { index, registry: Arc::new(InMemoryDocumentRegistry::new()) }
    }

    fn engine(&self) -> ExecutionEngine {
        self.engine_with_web_search(Arc::new(StubWebSearch(Vec::new())))
    }

    fn engine_with_web_search(&self, web_search: Arc<dyn WebSearchProvider>) -> ExecutionEngine {
        ExecutionEngine::builder()
            .index(self.index.clone())
            .registry(self.registry.clone() as Arc<dyn DocumentRegistry>)
            .providers(ProviderRegistry::mock_only())
            .web_search(web_search)
            .build()
            .unwrap()
    }

    async fn add_entry(&self, workspace: &str, text: &str, metadata: &[(&str, &str)]) {
        let embedder = HashingEmbedder::default();
        let embedding = embedder.embed(text).await.unwrap();
        let metadata: HashMap<String, String> =
            metadata.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.index
            .add_documents(workspace, &[text.to_string()], &[embedding], Some(vec![metadata]))
            .await
            .unwrap();
    }
}

fn echo_graph() -> WorkflowGraph {
    WorkflowGraph::new(
        vec![
            GraphNode::new("u1", NodeKind::UserQuery),
            GraphNode::new("o1", NodeKind::Output),
        ],
        vec![GraphEdge::new("u1", "o1")],
    )
}

fn retrieval_graph() -> WorkflowGraph {
    WorkflowGraph::new(
        vec![
            GraphNode::new("kb1", NodeKind::KnowledgeBase),
            GraphNode::new("o1", NodeKind::Output),
        ],
        vec![GraphEdge::new("kb1", "o1")],
    )
}

fn generation_graph(config: LlmEngineConfig) -> WorkflowGraph {
    WorkflowGraph::new(
        vec![
            GraphNode::new("u1", NodeKind::UserQuery),
            GraphNode::new("kb1", NodeKind::KnowledgeBase),
            GraphNode::new("llm1", NodeKind::LlmEngine(config)),
            GraphNode::new("o1", NodeKind::Output),
        ],
        vec![
            GraphEdge::new("u1", "llm1"),
            GraphEdge::new("kb1", "llm1"),
            GraphEdge::new("llm1", "o1"),
        ],
    )
}

fn llm_config(api_key: Option<&str>) -> LlmEngineConfig {
    LlmEngineConfig { api_key: api_key.map(str::to_string), ..LlmEngineConfig::default() }
}

#[tokio::test]
async fn echo_path_returns_the_query_verbatim() {
    let fixture = Fixture::new();
    let result = fixture.engine().execute(&echo_graph(), "ws-1", "hello").await;

    assert!(result.success);
    assert_eq!(result.response.as_deref(), Some("hello"));
    assert!(result.context_used.is_empty());
    assert_eq!(result.provider_used, "user");
    assert!(result.processing_time_seconds >= 0.0);
}

#[tokio::test]
async fn missing_output_node_is_a_structured_failure() {
    let fixture = Fixture::new();
    let graph = WorkflowGraph::new(vec![GraphNode::new("u1", NodeKind::UserQuery)], vec![]);
    let result = fixture.engine().execute(&graph, "ws-1", "hello").await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("No output node"));
    assert_eq!(result.processing_time_seconds, 0.0);
}

#[tokio::test]
async fn disconnected_output_is_a_structured_failure() {
    let fixture = Fixture::new();
    let graph = WorkflowGraph::new(
        vec![GraphNode::new("u1", NodeKind::UserQuery), GraphNode::new("o1", NodeKind::Output)],
        vec![],
    );
    let result = fixture.engine().execute(&graph, "ws-1", "hello").await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("not connected"));
}

#[tokio::test]
async fn output_feeding_output_is_unsupported() {
    let fixture = Fixture::new();
    let graph = WorkflowGraph::new(
        vec![GraphNode::new("o1", NodeKind::Output), GraphNode::new("o2", NodeKind::Output)],
        vec![GraphEdge::new("o2", "o1")],
    );
    let result = fixture.engine().execute(&graph, "ws-1", "hello").await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("Unsupported source 'output'"));
}

#[tokio::test]
async fn retrieval_path_returns_sentinel_on_empty_workspace() {
    let fixture = Fixture::new();
    let result = fixture.engine().execute(&retrieval_graph(), "fresh-ws", "anything").await;

    assert!(result.success);
    assert_eq!(result.response.as_deref(), Some("No matching context found."));
    assert!(result.context_used.is_empty());
    assert_eq!(result.provider_used, "knowledge-base");
}

#[tokio::test]
async fn retrieval_path_joins_matching_chunks() {
    let fixture = Fixture::new();
    fixture
        .add_entry("ws-1", "the refund window is thirty days", &[(META_WORKSPACE_ID, "ws-1")])
        .await;
    fixture
        .add_entry("ws-1", "support is reachable by email", &[(META_WORKSPACE_ID, "ws-1")])
        .await;

    let result =
        fixture.engine().execute(&retrieval_graph(), "ws-1", "refund window thirty days").await;

    assert!(result.success);
    let response = result.response.unwrap();
    assert!(response.contains("the refund window is thirty days"));
    assert!(response.contains("\n---\n"));
    assert_eq!(result.context_used.len(), 2);
}

#[tokio::test]
async fn generation_context_respects_workspace_tags() {
    let fixture = Fixture::new();
    // Both entries live in ws-1's collection, but one is tagged as
    // belonging to another workspace; only the matching one may reach
    // the prompt.
    fixture.add_entry("ws-1", "belongs to this workspace", &[(META_WORKSPACE_ID, "ws-1")]).await;
    fixture.add_entry("ws-1", "leaked from elsewhere", &[(META_WORKSPACE_ID, "ws-other")]).await;

    let graph = generation_graph(llm_config(Some("sk-test")));
    let result = fixture.engine().execute(&graph, "ws-1", "what do we know?").await;

    assert!(result.success);
    assert_eq!(result.context_used, vec!["belongs to this workspace".to_string()]);
}

#[tokio::test]
async fn generation_context_falls_back_to_filename_tags() {
    let fixture = Fixture::new();
    fixture.registry.record("ws-1", "minutes.pdf").await;
    fixture.add_entry("ws-1", "board meeting minutes", &[(META_FILENAME, "minutes.pdf")]).await;

    let graph = generation_graph(llm_config(Some("sk-test")));
    let result = fixture.engine().execute(&graph, "ws-1", "summarize the minutes").await;

    assert_eq!(result.context_used, vec!["board meeting minutes".to_string()]);
}

#[tokio::test]
async fn generation_prompt_carries_context_and_question() {
    let fixture = Fixture::new();
    fixture.add_entry("ws-1", "chunk in the prompt", &[(META_WORKSPACE_ID, "ws-1")]).await;

    let graph = generation_graph(llm_config(Some("sk-test")));
    let result = fixture.engine().execute(&graph, "ws-1", "what is in the prompt?").await;

    // The mock provider echoes the prompt it was handed.
    let response = result.response.unwrap();
    assert!(response.contains("Context from Knowledge Base:"));
    assert!(response.contains("chunk in the prompt"));
    assert!(response.contains("Question: what is in the prompt?"));
    assert!(response.ends_with("Answer:"));
    assert!(result.api_key_provided);
}

#[tokio::test]
async fn unknown_model_substitutes_the_provider_default() {
    let fixture = Fixture::new();
    let config = LlmEngineConfig {
        model: Some("not-a-real-model".to_string()),
        api_key: Some("sk-test".to_string()),
        ..LlmEngineConfig::default()
    };
    let result =
        fixture.engine().execute(&generation_graph(config), "ws-1", "hello").await;

    assert!(result.success);
    assert_eq!(result.model_used, "gpt-3.5-turbo");
    assert!(result.response.unwrap().starts_with("[mock:gpt-3.5-turbo]"));
}

#[tokio::test]
async fn missing_api_key_yields_a_labeled_placeholder() {
    let fixture = Fixture::new();
    let result =
        fixture.engine().execute(&generation_graph(llm_config(None)), "ws-1", "hello").await;

    assert!(result.success);
    assert!(!result.api_key_provided);
    let response = result.response.unwrap();
    assert!(response.contains("No API key provided"));
    assert!(response.contains("hello"));
}

#[tokio::test]
async fn web_search_results_reach_the_prompt() {
    let fixture = Fixture::new();
    let web_search = Arc::new(StubWebSearch(vec![WebSearchResult {
        title: "Rust 1.85 released".to_string(),
        snippet: "The release brings...".to_string(),
        url: "https://example.com/rust".to_string(),
    }]));
    let config = LlmEngineConfig {
        api_key: Some("sk-test".to_string()),
        use_web_search: true,
        serp_api_key: Some("serp-test".to_string()),
        ..LlmEngineConfig::default()
    };
    let result = fixture
        .engine_with_web_search(web_search)
        .execute(&generation_graph(config), "ws-1", "rust news")
        .await;

    assert!(result.success);
    assert!(result.web_search_used);
    let response = result.response.unwrap();
    assert!(response.contains("Web Search Results:"));
    assert!(response.contains("Rust 1.85 released"));
}

#[tokio::test]
async fn web_search_failure_degrades_to_zero_results() {
    let fixture = Fixture::new();
    let config = LlmEngineConfig {
        api_key: Some("sk-test".to_string()),
        use_web_search: true,
        serp_api_key: Some("serp-test".to_string()),
        ..LlmEngineConfig::default()
    };
    let result = fixture
        .engine_with_web_search(Arc::new(FailingWebSearch))
        .execute(&generation_graph(config), "ws-1", "rust news")
        .await;

    assert!(result.success);
    assert!(!result.web_search_used);
    assert!(!result.response.unwrap().contains("Web Search Results:"));
}

#[tokio::test]
async fn web_search_without_key_is_skipped() {
    let fixture = Fixture::new();
    let config = LlmEngineConfig {
        api_key: Some("sk-test".to_string()),
        use_web_search: true,
        serp_api_key: None,
        ..LlmEngineConfig::default()
    };
    let result =
        fixture.engine().execute(&generation_graph(config), "ws-1", "anything").await;

    assert!(result.success);
    assert!(!result.web_search_used);
}

#[tokio::test]
async fn llm_without_knowledge_base_has_empty_context() {
    let fixture = Fixture::new();
    fixture.add_entry("ws-1", "stored but unattached", &[(META_WORKSPACE_ID, "ws-1")]).await;

    let graph = WorkflowGraph::new(
        vec![
            GraphNode::new("u1", NodeKind::UserQuery),
            GraphNode::new("llm1", NodeKind::LlmEngine(llm_config(Some("sk-test")))),
            GraphNode::new("o1", NodeKind::Output),
        ],
        vec![GraphEdge::new("u1", "llm1"), GraphEdge::new("llm1", "o1")],
    );
    let result = fixture.engine().execute(&graph, "ws-1", "hello").await;

    assert!(result.success);
    assert!(result.context_used.is_empty());
    assert!(!result.response.unwrap().contains("Context from Knowledge Base:"));
}

#[tokio::test]
async fn custom_instructions_are_included_in_the_prompt() {
    let fixture = Fixture::new();
    let config = LlmEngineConfig {
        api_key: Some("sk-test".to_string()),
        instructions: Some("Answer in one sentence.".to_string()),
        ..LlmEngineConfig::default()
    };
    let result =
        fixture.engine().execute(&generation_graph(config), "ws-1", "hello").await;

    let response = result.response.unwrap();
    assert!(response.contains("Instructions:\nAnswer in one sentence."));
}
