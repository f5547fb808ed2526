//! Nodes, clusters and the child type that nests them.

use serde::Serialize;

use crate::identifier::Id;

/// A single labeled box in the diagram.
///
/// The category is a free-form styling hint (for example `"aws.network"`)
/// that only renderers look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: Id,
    label: String,
    category: String,
}

impl Node {
    /// Create a new node.
    pub fn new(id: Id, label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            category: category.into(),
        }
    }

    /// Returns the node identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the styling category.
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A named group of nodes and nested clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    id: Id,
    label: String,
    children: Vec<Child>,
}

impl Cluster {
    /// Create a sealed cluster from its children in declaration order.
    pub fn new(id: Id, label: impl Into<String>, children: Vec<Child>) -> Self {
        Self {
            id,
            label: label.into(),
            children,
        }
    }

    /// Returns the cluster identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the children in declaration order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }
}

/// Either kind of entity that can sit inside a cluster or at the graph root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Child {
    Node(Node),
    Cluster(Cluster),
}

impl Child {
    /// Returns the identifier of the wrapped node or cluster.
    pub fn id(&self) -> Id {
        match self {
            Child::Node(node) => node.id(),
            Child::Cluster(cluster) => cluster.id(),
        }
    }

    /// Returns the display label of the wrapped node or cluster.
    pub fn label(&self) -> &str {
        match self {
            Child::Node(node) => node.label(),
            Child::Cluster(cluster) => cluster.label(),
        }
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Cluster> for Child {
    fn from(cluster: Cluster) -> Self {
        Child::Cluster(cluster)
    }
}
