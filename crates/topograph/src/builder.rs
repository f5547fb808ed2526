//! Scoped construction of diagram graphs.
//!
//! A [`GraphSession`] owns the graph while it is being built. Clusters are
//! opened and closed in stack order, either through the [`ClusterScope`]
//! guard (closed automatically on drop) or through the explicit
//! [`GraphSession::open_cluster`] / [`GraphSession::close_cluster`] pair.
//! Every call validates immediately; [`GraphSession::end_graph`] returns the
//! immutable [`GraphDescription`](topograph_core::semantic::GraphDescription).

mod registry;
mod scope;
mod session;

pub use scope::ClusterScope;
pub use session::GraphSession;

use topograph_core::identifier::Id;

/// Reference to a node, used as an edge endpoint.
///
/// Returned by [`GraphSession::add_node`]. A reference can also be made from
/// a bare identifier; it is checked against the session when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(Id);

impl NodeRef {
    pub fn new(id: Id) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Id {
        self.0
    }
}

impl From<Id> for NodeRef {
    fn from(id: Id) -> Self {
        Self(id)
    }
}

impl From<&NodeRef> for NodeRef {
    fn from(node_ref: &NodeRef) -> Self {
        *node_ref
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        Self(Id::new(id))
    }
}

/// Handle to a cluster opened with [`GraphSession::open_cluster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterRef {
    id: Id,
    depth: usize,
}

impl ClusterRef {
    pub fn id(&self) -> Id {
        self.id
    }

    /// Nesting depth of the cluster, 1 for a cluster at the graph root.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
