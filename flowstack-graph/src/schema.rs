//! Workflow graph data types.
//!
//! A workflow is a small directed graph of typed nodes drawn on a canvas.
//! The JSON shape the canvas emits is `{id, type, data}` per node and
//! `{source, target}` per edge; node types form a closed set, so
//! [`NodeKind`] is a tagged enum with a payload per variant rather than an
//! open string-keyed map. An unknown `type` string fails parsing with
//! [`GraphError::UnknownNodeType`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

/// Configuration carried by an `llmEngine` node.
///
/// All fields are optional on the canvas; missing fields take these
/// defaults. The API keys are per-node because each workflow brings its
/// own credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmEngineConfig {
    /// Generation provider name (`openai`, `anthropic`, `gemini`, ...).
    pub provider: String,
    /// Requested model; validated against the provider's allow-list at
    /// execution time.
    pub model: Option<String>,
    /// API key for the generation provider.
    pub api_key: Option<String>,
    /// Custom instructions prepended to the question.
    pub instructions: Option<String>,
    /// Whether to augment the prompt with external web search results.
    pub use_web_search: bool,
    /// API key for the web search provider.
    pub serp_api_key: Option<String>,
}

impl Default for LlmEngineConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            instructions: None,
            use_web_search: false,
            serp_api_key: None,
        }
    }
}

/// The closed set of node types a workflow can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The user's query, passed through verbatim.
    UserQuery,
    /// A workspace-scoped document collection.
    KnowledgeBase,
    /// A generation call with per-node provider configuration.
    LlmEngine(LlmEngineConfig),
    /// The terminal node; execution resolves backward from here.
    Output,
}

impl NodeKind {
    /// The canvas type string for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::UserQuery => "userQuery",
            NodeKind::KnowledgeBase => "knowledgeBase",
            NodeKind::LlmEngine(_) => "llmEngine",
            NodeKind::Output => "output",
        }
    }
}

/// One node of a workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct GraphNode {
    /// Node id, unique within the graph.
    pub id: String,
    /// The node's type and per-type payload.
    pub kind: NodeKind,
}

impl GraphNode {
    /// Create a node.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self { id: id.into(), kind }
    }
}

/// The wire shape the canvas emits for a node.
#[derive(Clone, Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawNode> for GraphNode {
    type Error = GraphError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_str() {
            "userQuery" => NodeKind::UserQuery,
            "knowledgeBase" => NodeKind::KnowledgeBase,
            "output" => NodeKind::Output,
            "llmEngine" => {
                let config = if raw.data.is_null() {
                    LlmEngineConfig::default()
                } else {
                    serde_json::from_value(raw.data).map_err(|e| {
                        GraphError::MalformedGraph(format!(
                            "invalid llmEngine data for node '{}': {e}",
                            raw.id
                        ))
                    })?
                };
                NodeKind::LlmEngine(config)
            }
            other => return Err(GraphError::UnknownNodeType(other.to_string())),
        };
        Ok(GraphNode { id: raw.id, kind })
    }
}

impl From<GraphNode> for RawNode {
    fn from(node: GraphNode) -> Self {
        let (kind, data) = match node.kind {
            NodeKind::UserQuery => ("userQuery", Value::Null),
            NodeKind::KnowledgeBase => ("knowledgeBase", Value::Null),
            NodeKind::Output => ("output", Value::Null),
            NodeKind::LlmEngine(config) => {
                ("llmEngine", serde_json::to_value(config).unwrap_or(Value::Null))
            }
        };
        RawNode { id: node.id, kind: kind.to_string(), data }
    }
}

/// A directed edge between two nodes, identified by node id.
///
/// Edges carry no weight; list order is the only ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Id of the node the edge leaves.
    pub source: String,
    /// Id of the node the edge enters.
    pub target: String,
}

impl GraphEdge {
    /// Create an edge from `source` to `target`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

/// A workflow graph: the resolver's input.
///
/// Executable graphs contain at least one [`NodeKind::Output`] node with
/// at least one incoming edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    /// The graph's nodes, in canvas insertion order.
    pub nodes: Vec<GraphNode>,
    /// The graph's edges, in canvas insertion order.
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    /// Create a graph from nodes and edges.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }
}
