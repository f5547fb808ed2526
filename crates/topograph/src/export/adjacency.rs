//! Flat edge-list export.

use serde::Serialize;

use topograph_core::{identifier::Id, semantic::GraphDescription};

/// One directed `(source, destination)` pair.
///
/// Endpoints are fully-qualified paths: enclosing cluster identifiers and
/// the node identifier joined with `::`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRecord {
    from: String,
    to: String,
    label: Option<String>,
}

impl EdgeRecord {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Expands every edge declaration into one record per pair, preserving
/// declaration order.
pub(super) fn edge_records(graph: &GraphDescription) -> Vec<EdgeRecord> {
    // Every endpoint of a `GraphDescription` names a node in `paths`.
    let paths = graph.node_paths();
    let qualify = |id: Id| paths.get(&id).copied().unwrap_or(id).to_string();
    let qualify = &qualify;

    graph
        .edges()
        .iter()
        .flat_map(|edge| {
            edge.pairs().map(move |(source, destination)| EdgeRecord {
                from: qualify(source),
                to: qualify(destination),
                label: edge.label().map(str::to_owned),
            })
        })
        .collect()
}
