//! Graph root, edges and rendering direction.

use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    identifier::Id,
    semantic::element::{Child, Node},
};

/// Direction in which the renderer should lay out ranks.
///
/// The names match external configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    /// Top to bottom (default)
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    /// Bottom to top
    #[serde(rename = "BT")]
    BottomToTop,
    /// Left to right
    #[serde(rename = "LR")]
    LeftToRight,
    /// Right to left
    #[serde(rename = "RL")]
    RightToLeft,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TB" => Ok(Self::TopToBottom),
            "BT" => Ok(Self::BottomToTop),
            "LR" => Ok(Self::LeftToRight),
            "RL" => Ok(Self::RightToLeft),
            _ => Err("Unsupported direction, expected one of TB, BT, LR, RL"),
        }
    }
}

impl From<Direction> for &'static str {
    fn from(val: Direction) -> Self {
        match val {
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
            Direction::LeftToRight => "LR",
            Direction::RightToLeft => "RL",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A directed connection from every source to every destination.
///
/// One declaration may fan out (`1 → N`), fan in (`N → 1`) or connect a
/// single pair; all share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    sources: Vec<Id>,
    destinations: Vec<Id>,
    label: Option<String>,
}

impl Edge {
    /// Create a new edge.
    pub fn new(sources: Vec<Id>, destinations: Vec<Id>, label: Option<String>) -> Self {
        Self {
            sources,
            destinations,
            label,
        }
    }

    pub fn sources(&self) -> &[Id] {
        &self.sources
    }

    pub fn destinations(&self) -> &[Id] {
        &self.destinations
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Expands the declaration into `(source, destination)` pairs.
    ///
    /// Pairs are ordered by source first, then destination, both in
    /// declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.sources.iter().flat_map(move |&source| {
            self.destinations
                .iter()
                .map(move |&destination| (source, destination))
        })
    }
}

/// Why a set of children and edges does not form a valid graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("identifier `{0}` is empty or contains `::`")]
    InvalidId(Id),

    #[error("node `{id}` is declared twice, first at `{existing}`")]
    DuplicateNode { id: Id, existing: Id },

    #[error("cluster `{id}` is declared twice, first at `{existing}`")]
    DuplicateCluster { id: Id, existing: Id },

    #[error("edge endpoint `{0}` is not a declared node")]
    UnknownNode(Id),

    #[error("edge #{0} has no sources or no destinations")]
    EmptyEdge(usize),
}

/// A finished, structurally valid diagram graph.
///
/// Immutable once constructed. Every node identifier is unique, every
/// cluster identifier is unique among clusters, and every edge endpoint
/// names a node of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDescription {
    title: String,
    direction: Direction,
    children: Vec<Child>,
    edges: Vec<Edge>,
}

impl GraphDescription {
    /// Create a new description from root children and edges.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if an identifier is not a valid path
    /// segment, a node or cluster identifier repeats, or an edge is empty
    /// or points at something other than a node.
    pub fn new(
        title: impl Into<String>,
        direction: Direction,
        children: Vec<Child>,
        edges: Vec<Edge>,
    ) -> Result<Self, GraphError> {
        let mut nodes = HashMap::new();
        let mut clusters = HashMap::new();
        check_children(&children, None, &mut nodes, &mut clusters)?;

        for (index, edge) in edges.iter().enumerate() {
            if edge.sources().is_empty() || edge.destinations().is_empty() {
                return Err(GraphError::EmptyEdge(index));
            }
            if let Some(&unknown) = edge
                .sources()
                .iter()
                .chain(edge.destinations())
                .find(|id| !nodes.contains_key(*id))
            {
                return Err(GraphError::UnknownNode(unknown));
            }
        }

        Ok(Self {
            title: title.into(),
            direction,
            children,
            edges,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Root-level children in declaration order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Visits every node depth-first in declaration order, along with the
    /// identifiers of its enclosing clusters (outermost first).
    pub fn for_each_node<F>(&self, mut visit: F)
    where
        F: FnMut(&Node, &[Id]),
    {
        fn walk<F>(children: &[Child], ancestors: &mut Vec<Id>, visit: &mut F)
        where
            F: FnMut(&Node, &[Id]),
        {
            for child in children {
                match child {
                    Child::Node(node) => visit(node, ancestors),
                    Child::Cluster(cluster) => {
                        ancestors.push(cluster.id());
                        walk(cluster.children(), ancestors, visit);
                        ancestors.pop();
                    }
                }
            }
        }

        walk(&self.children, &mut Vec::new(), &mut visit);
    }

    /// Returns the number of nodes in the whole cluster tree.
    pub fn nodes_count(&self) -> usize {
        let mut count = 0;
        self.for_each_node(|_, _| count += 1);
        count
    }

    /// Maps every node identifier to its fully-qualified path.
    ///
    /// A path joins the enclosing cluster identifiers and the node
    /// identifier with `::`. Root-level nodes map to themselves.
    pub fn node_paths(&self) -> HashMap<Id, Id> {
        let mut paths = HashMap::new();
        self.for_each_node(|node, ancestors| {
            let path = ancestors
                .iter()
                .rev()
                .fold(node.id(), |path, ancestor| ancestor.create_nested(path));
            paths.insert(node.id(), path);
        });
        paths
    }
}

/// Records every node and cluster under `children` with its path.
fn check_children(
    children: &[Child],
    parent: Option<Id>,
    nodes: &mut HashMap<Id, Id>,
    clusters: &mut HashMap<Id, Id>,
) -> Result<(), GraphError> {
    for child in children {
        let id = child.id();
        if !id.is_path_segment() {
            return Err(GraphError::InvalidId(id));
        }
        let path = parent.map_or(id, |parent| parent.create_nested(id));

        match child {
            Child::Node(_) => {
                if let Some(&existing) = nodes.get(&id) {
                    return Err(GraphError::DuplicateNode { id, existing });
                }
                nodes.insert(id, path);
            }
            Child::Cluster(cluster) => {
                if let Some(&existing) = clusters.get(&id) {
                    return Err(GraphError::DuplicateCluster { id, existing });
                }
                clusters.insert(id, path);
                check_children(cluster.children(), Some(path), nodes, clusters)?;
            }
        }
    }
    Ok(())
}
