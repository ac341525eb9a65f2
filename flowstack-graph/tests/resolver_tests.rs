//! Graph resolution tests: active path selection and misconfiguration.

use flowstack_graph::{
    GraphEdge, GraphError, GraphNode, LlmEngineConfig, NodeKind, WorkflowGraph, resolve,
};

fn user_query(id: &str) -> GraphNode {
    GraphNode::new(id, NodeKind::UserQuery)
}

fn knowledge_base(id: &str) -> GraphNode {
    GraphNode::new(id, NodeKind::KnowledgeBase)
}

fn llm_engine(id: &str) -> GraphNode {
    GraphNode::new(id, NodeKind::LlmEngine(LlmEngineConfig::default()))
}

fn output(id: &str) -> GraphNode {
    GraphNode::new(id, NodeKind::Output)
}

#[test]
fn resolves_the_node_feeding_the_output() {
    let graph = WorkflowGraph::new(
        vec![user_query("u1"), output("o1")],
        vec![GraphEdge::new("u1", "o1")],
    );
    let resolved = resolve(&graph).unwrap();
    assert_eq!(resolved.source.id, "u1");
    assert!(resolved.upstream_of_source.is_empty());
}

#[test]
fn missing_output_node_is_an_error() {
    let graph = WorkflowGraph::new(vec![user_query("u1")], vec![]);
    assert!(matches!(resolve(&graph), Err(GraphError::NoOutputNode)));
}

#[test]
fn output_without_incoming_edges_is_an_error() {
    let graph = WorkflowGraph::new(vec![user_query("u1"), output("o1")], vec![]);
    assert!(matches!(resolve(&graph), Err(GraphError::DisconnectedOutput)));
}

#[test]
fn first_output_in_insertion_order_is_honored() {
    let graph = WorkflowGraph::new(
        vec![user_query("u1"), knowledge_base("kb1"), output("o1"), output("o2")],
        vec![GraphEdge::new("u1", "o1"), GraphEdge::new("kb1", "o2")],
    );
    let resolved = resolve(&graph).unwrap();
    assert_eq!(resolved.source.id, "u1");
}

#[test]
fn first_incoming_edge_in_insertion_order_is_honored() {
    let graph = WorkflowGraph::new(
        vec![user_query("u1"), knowledge_base("kb1"), output("o1")],
        vec![GraphEdge::new("kb1", "o1"), GraphEdge::new("u1", "o1")],
    );
    let resolved = resolve(&graph).unwrap();
    assert_eq!(resolved.source.id, "kb1");
}

#[test]
fn llm_source_carries_its_upstream_nodes() {
    let graph = WorkflowGraph::new(
        vec![user_query("u1"), knowledge_base("kb1"), llm_engine("llm1"), output("o1")],
        vec![
            GraphEdge::new("u1", "llm1"),
            GraphEdge::new("kb1", "llm1"),
            GraphEdge::new("llm1", "o1"),
        ],
    );
    let resolved = resolve(&graph).unwrap();
    assert_eq!(resolved.source.id, "llm1");
    let upstream_ids: Vec<&str> =
        resolved.upstream_of_source.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(upstream_ids, vec!["u1", "kb1"]);
}

#[test]
fn non_llm_source_has_no_upstream_scan() {
    let graph = WorkflowGraph::new(
        vec![user_query("u1"), knowledge_base("kb1"), output("o1")],
        vec![GraphEdge::new("u1", "kb1"), GraphEdge::new("kb1", "o1")],
    );
    let resolved = resolve(&graph).unwrap();
    assert_eq!(resolved.source.id, "kb1");
    assert!(resolved.upstream_of_source.is_empty());
}

#[test]
fn dangling_edge_sources_are_skipped() {
    let graph = WorkflowGraph::new(
        vec![user_query("u1"), output("o1")],
        vec![GraphEdge::new("ghost", "o1"), GraphEdge::new("u1", "o1")],
    );
    let resolved = resolve(&graph).unwrap();
    assert_eq!(resolved.source.id, "u1");
}

#[test]
fn output_fed_only_by_dangling_edges_is_disconnected() {
    let graph = WorkflowGraph::new(
        vec![output("o1")],
        vec![GraphEdge::new("ghost", "o1")],
    );
    assert!(matches!(resolve(&graph), Err(GraphError::DisconnectedOutput)));
}
