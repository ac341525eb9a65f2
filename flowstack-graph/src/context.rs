//! Knowledge base context gathering for retrieval-augmented generation.
//!
//! When an `llmEngine` node has a knowledge base attached, the engine
//! scans *every* entry stored for the workspace (full collection scan,
//! not top-k) and keeps the entries that belong to it. Ownership is
//! decided by an ordered list of matcher strategies, evaluated in
//! priority order per entry; the first strategy that matches wins, and an
//! entry no strategy claims is not included.
//!
//! The last strategy (a known filename appearing as a substring of the
//! entry text) is a heuristic, not guaranteed-correct provenance: it can
//! over-match when one document's filename happens to occur in another
//! document's body. Kept for parity with metadata written by earlier
//! ingests that lacked workspace tags; extenders should prefer the
//! metadata tiers.

use flowstack_rag::{IndexEntry, META_FILENAME, META_WORKSPACE_ID, WorkspaceIndex};
use tracing::{debug, warn};

use crate::registry::DocumentRegistry;

/// What an entry is matched against.
struct MatchContext<'a> {
    workspace_id: &'a str,
    document_names: &'a [String],
}

type Strategy = fn(&IndexEntry, &MatchContext) -> bool;

/// Matcher strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("workspace_id", match_by_workspace_id),
    ("filename", match_by_filename_tag),
    ("content", match_by_content_substring),
];

/// Tier 1: the entry's metadata names this workspace.
fn match_by_workspace_id(entry: &IndexEntry, ctx: &MatchContext) -> bool {
    entry.metadata.get(META_WORKSPACE_ID).is_some_and(|id| id == ctx.workspace_id)
}

/// Tier 2: the entry's filename tag is a known document of this workspace.
fn match_by_filename_tag(entry: &IndexEntry, ctx: &MatchContext) -> bool {
    entry
        .metadata
        .get(META_FILENAME)
        .is_some_and(|name| ctx.document_names.iter().any(|known| known == name))
}

/// Tier 3: a known document name (with or without its `.pdf` extension)
/// occurs inside the entry text.
fn match_by_content_substring(entry: &IndexEntry, ctx: &MatchContext) -> bool {
    ctx.document_names.iter().filter(|name| !name.is_empty()).any(|name| {
        if entry.text.contains(name.as_str()) {
            return true;
        }
        let stem = name.strip_suffix(".pdf").or_else(|| name.strip_suffix(".PDF"));
        stem.is_some_and(|stem| !stem.is_empty() && entry.text.contains(stem))
    })
}

/// Return the name of the first strategy claiming the entry, if any.
fn matched_by(entry: &IndexEntry, ctx: &MatchContext) -> Option<&'static str> {
    STRATEGIES.iter().find(|(_, strategy)| strategy(entry, ctx)).map(|(name, _)| *name)
}

/// Gather the texts of every stored entry belonging to a workspace.
///
/// Lookup and scan failures degrade to an empty context with a warning;
/// a missing knowledge base must not fail the execution.
pub async fn gather_workspace_context(
    index: &WorkspaceIndex,
    registry: &dyn DocumentRegistry,
    workspace_id: &str,
) -> Vec<String> {
    let document_names = match registry.list_document_names(workspace_id).await {
        Ok(names) => names,
        Err(e) => {
            warn!(workspace = workspace_id, error = %e, "document name lookup failed");
            Vec::new()
        }
    };

    let mut entries = match index.fetch_all(workspace_id).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(workspace = workspace_id, error = %e, "knowledge base scan failed");
            return Vec::new();
        }
    };
    entries.sort_by(|a, b| a.id.cmp(&b.id));

    let ctx = MatchContext { workspace_id, document_names: &document_names };
    let mut context = Vec::new();
    for entry in entries {
        match matched_by(&entry, &ctx) {
            Some(strategy) => {
                debug!(entry = %entry.id, strategy, "entry included in context");
                context.push(entry.text);
            }
            None => {
                debug!(entry = %entry.id, "entry not matched, skipped");
            }
        }
    }

    debug!(workspace = workspace_id, count = context.len(), "gathered knowledge base context");
    context
}
