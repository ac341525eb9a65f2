//! Graph resolution: locating the single active execution path.
//!
//! Execution starts at the terminal output node and walks one step
//! backward to the node that drives it. Fan-in and branching are out of
//! scope for this graph model: when several output nodes or several
//! incoming edges exist, the first in insertion order wins. The tie-break
//! is deterministic but arbitrary, a documented simplification rather
//! than an error.

use std::collections::HashMap;

use crate::error::{GraphError, Result};
use crate::schema::{GraphNode, NodeKind, WorkflowGraph};

/// The resolved single-path view of a graph.
#[derive(Debug)]
pub struct ResolvedPath<'a> {
    /// The node directly upstream of the active output node; its type
    /// selects the execution action.
    pub source: &'a GraphNode,
    /// Nodes with edges into `source`. Populated only when `source` is an
    /// `llmEngine` node, where it is scanned for attached knowledge bases.
    pub upstream_of_source: Vec<&'a GraphNode>,
}

/// Resolve the active execution path of a workflow graph.
///
/// Multiple output nodes are tolerated; only the first in insertion order
/// is honored. Edges whose source id matches no node are skipped.
///
/// # Errors
///
/// - [`GraphError::NoOutputNode`] if the graph has no output node.
/// - [`GraphError::DisconnectedOutput`] if the active output node has no
///   incoming edge with a resolvable source.
pub fn resolve(graph: &WorkflowGraph) -> Result<ResolvedPath<'_>> {
    let by_id: HashMap<&str, &GraphNode> =
        graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let incoming_sources = |target_id: &str| -> Vec<&GraphNode> {
        graph
            .edges
            .iter()
            .filter(|e| e.target == target_id)
            .filter_map(|e| by_id.get(e.source.as_str()).copied())
            .collect()
    };

    let active_output = graph
        .nodes
        .iter()
        .find(|n| matches!(n.kind, NodeKind::Output))
        .ok_or(GraphError::NoOutputNode)?;

    let sources_to_output = incoming_sources(&active_output.id);
    let source = sources_to_output.first().copied().ok_or(GraphError::DisconnectedOutput)?;

    let upstream_of_source = if matches!(source.kind, NodeKind::LlmEngine(_)) {
        incoming_sources(&source.id)
    } else {
        Vec::new()
    };

    Ok(ResolvedPath { source, upstream_of_source })
}
