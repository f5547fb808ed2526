//! Nested cluster-tree export.

use std::collections::HashMap;

use serde::Serialize;

use topograph_core::{
    identifier::Id,
    semantic::{Child, Direction, GraphDescription},
};

/// The whole graph as a nested tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeExport {
    title: String,
    direction: Direction,
    children: Vec<TreeEntry>,
    edges: Vec<TreeEdge>,
}

/// A node or cluster in the exported tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeEntry {
    Node {
        id: String,
        path: String,
        label: String,
        category: String,
    },
    Cluster {
        id: String,
        path: String,
        label: String,
        children: Vec<TreeEntry>,
    },
}

/// An edge declaration with its fan-out group intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEdge {
    sources: Vec<String>,
    destinations: Vec<String>,
    label: Option<String>,
}

impl TreeExport {
    pub(super) fn from_graph(graph: &GraphDescription) -> Self {
        let paths = graph.node_paths();
        let qualify = |id: &Id| paths.get(id).copied().unwrap_or(*id).to_string();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| TreeEdge {
                sources: edge.sources().iter().map(qualify).collect(),
                destinations: edge.destinations().iter().map(qualify).collect(),
                label: edge.label().map(str::to_owned),
            })
            .collect();

        Self {
            title: graph.title().to_string(),
            direction: graph.direction(),
            children: entries(graph.children(), None, &paths),
            edges,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn children(&self) -> &[TreeEntry] {
        &self.children
    }

    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }
}

impl TreeEntry {
    pub fn id(&self) -> &str {
        match self {
            TreeEntry::Node { id, .. } | TreeEntry::Cluster { id, .. } => id,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeEntry::Node { path, .. } | TreeEntry::Cluster { path, .. } => path,
        }
    }
}

impl TreeEdge {
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

fn entries(children: &[Child], parent: Option<Id>, paths: &HashMap<Id, Id>) -> Vec<TreeEntry> {
    children
        .iter()
        .map(|child| match child {
            Child::Node(node) => TreeEntry::Node {
                id: node.id().to_string(),
                path: paths.get(&node.id()).copied().unwrap_or(node.id()).to_string(),
                label: node.label().to_string(),
                category: node.category().to_string(),
            },
            Child::Cluster(cluster) => {
                let path = match parent {
                    Some(parent) => parent.create_nested(cluster.id()),
                    None => cluster.id(),
                };
                TreeEntry::Cluster {
                    id: cluster.id().to_string(),
                    path: path.to_string(),
                    label: cluster.label().to_string(),
                    children: entries(cluster.children(), Some(path), paths),
                }
            }
        })
        .collect()
}
