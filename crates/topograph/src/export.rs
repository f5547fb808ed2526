//! Structural exports of a finished graph.
//!
//! Exports are pure functions of a [`GraphDescription`]: they allocate a
//! new serializable value and never touch the filesystem. Two shapes are
//! available:
//!
//! - [`ExportFormat::AdjacencyList`] - one [`EdgeRecord`] per
//!   `(source, destination)` pair, with fully-qualified node paths.
//! - [`ExportFormat::Tree`] - the nested cluster tree plus the edges as
//!   declared (fan-out groups kept intact), see [`TreeExport`].

mod adjacency;
mod tree;

pub use adjacency::EdgeRecord;
pub use tree::{TreeEdge, TreeEntry, TreeExport};

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use log::debug;
use serde::{Deserialize, Serialize};

use topograph_core::semantic::GraphDescription;

/// Shape of a structural export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    AdjacencyList,
    Tree,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adjacency-list" => Ok(Self::AdjacencyList),
            "tree" => Ok(Self::Tree),
            _ => Err(format!(
                "unsupported export format `{s}`, expected `adjacency-list` or `tree`"
            )),
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdjacencyList => write!(f, "adjacency-list"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// The result of [`export`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Export {
    AdjacencyList(Vec<EdgeRecord>),
    Tree(TreeExport),
}

/// Produces the structural export of `graph` in the requested `format`.
///
/// # Examples
///
/// ```
/// use topograph::{DiagramBuilder, Export, ExportFormat, export, semantic::Direction};
///
/// let builder = DiagramBuilder::default();
/// let mut session = builder.begin_graph("T", Direction::TopToBottom).unwrap();
/// let a = session.add_node("a", "A", "x").unwrap();
/// let b = session.add_node("b", "B", "x").unwrap();
/// session.add_edge([a], [b], None).unwrap();
/// let graph = session.end_graph().unwrap();
///
/// let Export::AdjacencyList(records) = export(&graph, ExportFormat::AdjacencyList) else {
///     unreachable!();
/// };
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].from(), "a");
/// assert_eq!(records[0].to(), "b");
/// assert_eq!(records[0].label(), None);
/// ```
pub fn export(graph: &GraphDescription, format: ExportFormat) -> Export {
    debug!(title = graph.title(), format:? = format; "Exporting graph");
    match format {
        ExportFormat::AdjacencyList => Export::AdjacencyList(adjacency::edge_records(graph)),
        ExportFormat::Tree => Export::Tree(TreeExport::from_graph(graph)),
    }
}
