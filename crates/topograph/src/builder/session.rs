//! Build session: the mutable graph under construction.

use std::{cell::Cell, mem};

use log::{debug, info, trace};

use topograph_core::{
    identifier::Id,
    semantic::{Child, Cluster, Direction, Edge, GraphDescription, Node},
};

use super::{
    ClusterRef, NodeRef,
    registry::{EntityKind, Registry},
    scope::ClusterScope,
};
use crate::error::TopographError;

/// A cluster whose scope is still open.
#[derive(Debug)]
struct Frame {
    id: Id,
    label: String,
    path: Id,
    children: Vec<Child>,
}

/// An open build session.
///
/// Returned by [`DiagramBuilder::begin_graph`](crate::DiagramBuilder::begin_graph).
/// Clusters nest as a stack: nodes and clusters are always added to the
/// innermost open cluster, or to the graph root when none is open. Edges are
/// graph-global.
///
/// Dropping the session without calling [`GraphSession::end_graph`]
/// abandons it and allows the builder to open a new one.
#[derive(Debug)]
pub struct GraphSession<'b> {
    open_flag: &'b Cell<bool>,
    title: String,
    direction: Direction,
    root: Vec<Child>,
    stack: Vec<Frame>,
    edges: Vec<Edge>,
    registry: Registry,
    anonymous_clusters: usize,
}

impl<'b> GraphSession<'b> {
    pub(crate) fn new(open_flag: &'b Cell<bool>, title: String, direction: Direction) -> Self {
        Self {
            open_flag,
            title,
            direction,
            root: Vec::new(),
            stack: Vec::new(),
            edges: Vec::new(),
            registry: Registry::default(),
            anonymous_clusters: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns how many cluster scopes are currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the number of nodes registered so far.
    pub fn nodes_count(&self) -> usize {
        self.registry.count(EntityKind::Node)
    }

    /// Returns the number of edge declarations registered so far.
    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if `id` names a node or cluster declared in this session.
    pub fn is_declared(&self, id: impl Into<Id>) -> bool {
        self.registry.contains(id.into())
    }

    /// Opens a cluster with a generated identifier and returns a guard that
    /// closes it when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use topograph::{DiagramBuilder, semantic::Direction};
    ///
    /// let builder = DiagramBuilder::default();
    /// let mut session = builder.begin_graph("Example", Direction::TopToBottom).unwrap();
    /// {
    ///     let mut vpc = session.begin_cluster("VPC").unwrap();
    ///     vpc.add_node("alb", "Load Balancer", "aws.network").unwrap();
    /// }
    /// let graph = session.end_graph().unwrap();
    /// assert_eq!(graph.children().len(), 1);
    /// ```
    pub fn begin_cluster(
        &mut self,
        label: impl Into<String>,
    ) -> Result<ClusterScope<'_, 'b>, TopographError> {
        let cluster = self.open_cluster(label)?;
        Ok(ClusterScope::new(self, cluster))
    }

    /// Like [`GraphSession::begin_cluster`] with a caller-chosen identifier.
    ///
    /// # Errors
    ///
    /// Same as [`GraphSession::open_cluster_with_id`].
    pub fn begin_cluster_with_id(
        &mut self,
        id: impl Into<Id>,
        label: impl Into<String>,
    ) -> Result<ClusterScope<'_, 'b>, TopographError> {
        let cluster = self.open_cluster_with_id(id, label)?;
        Ok(ClusterScope::new(self, cluster))
    }

    /// Opens a cluster with a generated identifier without a guard.
    ///
    /// The caller must pass the returned handle to
    /// [`GraphSession::close_cluster`].
    pub fn open_cluster(&mut self, label: impl Into<String>) -> Result<ClusterRef, TopographError> {
        let parent = self.stack.last().map(|frame| frame.path);
        let id = self
            .registry
            .register_generated(&mut self.anonymous_clusters, |id| {
                parent.map_or(id, |parent| parent.create_nested(id))
            });

        Ok(self.push_frame(id, label.into()))
    }

    /// Opens a cluster with a caller-chosen identifier without a guard.
    ///
    /// # Errors
    ///
    /// - [`TopographError::InvalidId`] if `id` is empty or contains `::`.
    /// - [`TopographError::DuplicateId`] if `id` is already declared.
    pub fn open_cluster_with_id(
        &mut self,
        id: impl Into<Id>,
        label: impl Into<String>,
    ) -> Result<ClusterRef, TopographError> {
        let id = id.into();
        let path = self.qualify(id);
        self.registry.register(id, EntityKind::Cluster, path)?;

        Ok(self.push_frame(id, label.into()))
    }

    /// Seals the innermost open cluster and attaches it to its parent.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::State`] if `cluster` is not the innermost
    /// open cluster.
    pub fn close_cluster(&mut self, cluster: ClusterRef) -> Result<(), TopographError> {
        let is_innermost = self
            .stack
            .last()
            .is_some_and(|frame| frame.id == cluster.id && self.stack.len() == cluster.depth);
        if !is_innermost {
            return Err(TopographError::state(format!(
                "cluster `{}` is not the innermost open cluster",
                cluster.id
            )));
        }

        let Some(frame) = self.stack.pop() else {
            return Err(TopographError::state("no cluster is open"));
        };
        let sealed = Cluster::new(frame.id, frame.label, frame.children);
        debug!(id = sealed.id().to_string(), children = sealed.children().len(); "Cluster closed");
        self.push_child(sealed.into());

        Ok(())
    }

    /// Registers a node in the innermost open scope.
    ///
    /// # Errors
    ///
    /// - [`TopographError::InvalidId`] if `id` is empty or contains `::`.
    /// - [`TopographError::DuplicateId`] if `id` is already declared
    ///   anywhere in the graph.
    pub fn add_node(
        &mut self,
        id: impl Into<Id>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<NodeRef, TopographError> {
        let id = id.into();
        let path = self.qualify(id);
        self.registry.register(id, EntityKind::Node, path)?;

        let node = Node::new(id, label, category);
        debug!(id = id.to_string(), path = path.to_string(), category = node.category(); "Node added");
        self.push_child(node.into());

        Ok(NodeRef::new(id))
    }

    /// Registers an edge from every source to every destination.
    ///
    /// All references are checked before anything is recorded, so a failed
    /// call leaves the session unchanged.
    ///
    /// # Errors
    ///
    /// - [`TopographError::InvalidEdge`] if either side is empty.
    /// - [`TopographError::Reference`] if a reference is not a declared node.
    pub fn add_edge<S, D>(
        &mut self,
        sources: S,
        destinations: D,
        label: Option<&str>,
    ) -> Result<(), TopographError>
    where
        S: IntoIterator,
        S::Item: Into<NodeRef>,
        D: IntoIterator,
        D::Item: Into<NodeRef>,
    {
        let sources = self.resolve_all(sources)?;
        let destinations = self.resolve_all(destinations)?;
        if sources.is_empty() || destinations.is_empty() {
            return Err(TopographError::InvalidEdge(
                "an edge needs at least one source and one destination".to_string(),
            ));
        }

        debug!(
            sources = sources.len(),
            destinations = destinations.len(),
            label:?;
            "Edge added"
        );
        self.edges
            .push(Edge::new(sources, destinations, label.map(str::to_owned)));

        Ok(())
    }

    /// Registers `a → b → c …` as consecutive one-to-one edges.
    ///
    /// The chain is validated as a whole: either every link is recorded or
    /// none is.
    ///
    /// # Errors
    ///
    /// - [`TopographError::InvalidEdge`] if fewer than two nodes are given.
    /// - [`TopographError::Reference`] if a reference is not a declared node.
    pub fn add_chain<I>(&mut self, nodes: I, label: Option<&str>) -> Result<(), TopographError>
    where
        I: IntoIterator,
        I::Item: Into<NodeRef>,
    {
        let nodes = self.resolve_all(nodes)?;
        if nodes.len() < 2 {
            return Err(TopographError::InvalidEdge(
                "a chain needs at least two nodes".to_string(),
            ));
        }

        for link in nodes.windows(2) {
            self.edges.push(Edge::new(
                vec![link[0]],
                vec![link[1]],
                label.map(str::to_owned),
            ));
        }
        debug!(links = nodes.len() - 1; "Chain added");

        Ok(())
    }

    /// Closes the root scope and returns the finished graph.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::State`] if any cluster scope is still open.
    pub fn end_graph(mut self) -> Result<GraphDescription, TopographError> {
        if let Some(frame) = self.stack.last() {
            return Err(TopographError::state(format!(
                "cannot end graph `{}`: {} cluster(s) still open, innermost is `{}`",
                self.title,
                self.stack.len(),
                frame.id
            )));
        }

        let graph = GraphDescription::new(
            mem::take(&mut self.title),
            self.direction,
            mem::take(&mut self.root),
            mem::take(&mut self.edges),
        )?;
        info!(
            title = graph.title(),
            nodes = self.registry.count(EntityKind::Node),
            edges = graph.edges().len();
            "Graph ended"
        );
        trace!(graph:?; "Graph description");

        Ok(graph)
    }

    fn qualify(&self, id: Id) -> Id {
        match self.stack.last() {
            Some(parent) => parent.path.create_nested(id),
            None => id,
        }
    }

    fn push_frame(&mut self, id: Id, label: String) -> ClusterRef {
        let path = self.qualify(id);
        self.stack.push(Frame {
            id,
            label,
            path,
            children: Vec::new(),
        });
        debug!(id = id.to_string(), depth = self.stack.len(); "Cluster opened");

        ClusterRef {
            id,
            depth: self.stack.len(),
        }
    }

    fn push_child(&mut self, child: Child) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(child),
            None => self.root.push(child),
        }
    }

    fn resolve_all<I>(&self, refs: I) -> Result<Vec<Id>, TopographError>
    where
        I: IntoIterator,
        I::Item: Into<NodeRef>,
    {
        refs.into_iter()
            .map(|node_ref| {
                let id = node_ref.into().id();
                self.registry.resolve_node(id).map(|_| id)
            })
            .collect()
    }
}

impl Drop for GraphSession<'_> {
    fn drop(&mut self) {
        self.open_flag.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(flag: &Cell<bool>) -> GraphSession<'_> {
        flag.set(true);
        GraphSession::new(flag, "Test".to_string(), Direction::TopToBottom)
    }

    #[test]
    fn test_nodes_go_to_innermost_scope() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        session.add_node("users", "Users", "onprem.client").unwrap();
        let account = session.open_cluster_with_id("account", "AWS Account").unwrap();
        session.add_node("igw", "Internet Gateway", "aws.network").unwrap();
        let vpc = session.open_cluster_with_id("vpc", "VPC").unwrap();
        session.add_node("alb", "ALB", "aws.network").unwrap();
        session.close_cluster(vpc).unwrap();
        session.close_cluster(account).unwrap();

        let graph = session.end_graph().unwrap();
        assert_eq!(graph.children().len(), 2);

        let Child::Cluster(account) = &graph.children()[1] else {
            panic!("Expected cluster");
        };
        assert_eq!(account.children().len(), 2);
        assert_eq!(account.children()[0].id(), "igw");
        assert_eq!(account.children()[1].id(), "vpc");

        let paths = graph.node_paths();
        assert_eq!(paths[&Id::new("alb")], "account::vpc::alb");
    }

    #[test]
    fn test_close_non_innermost_fails() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        let outer = session.open_cluster("Outer").unwrap();
        let inner = session.open_cluster("Inner").unwrap();

        assert!(matches!(
            session.close_cluster(outer),
            Err(TopographError::State(_))
        ));
        assert_eq!(session.depth(), 2);

        session.close_cluster(inner).unwrap();
        session.close_cluster(outer).unwrap();
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_close_twice_fails() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        let cluster = session.open_cluster("Once").unwrap();
        session.close_cluster(cluster).unwrap();

        assert!(matches!(
            session.close_cluster(cluster),
            Err(TopographError::State(_))
        ));
    }

    #[test]
    fn test_anonymous_ids_skip_taken_names() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        session.add_node("__0", "Squatter", "misc").unwrap();
        let cluster = session.open_cluster("Anonymous").unwrap();

        assert_eq!(cluster.id(), "__1");
        session.close_cluster(cluster).unwrap();
    }

    #[test]
    fn test_node_may_reuse_generated_cluster_id() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        let zone = session.open_cluster("Zone").unwrap();
        assert_eq!(zone.id(), "__0");
        let node = session.add_node("__0", "Named like the zone", "misc").unwrap();
        session.close_cluster(zone).unwrap();
        session.add_node("peer", "Peer", "misc").unwrap();
        session.add_edge(["peer"], [node], None).unwrap();

        let graph = session.end_graph().unwrap();
        assert_eq!(graph.nodes_count(), 2);
        assert_eq!(graph.node_paths()[&Id::new("__0")], "__0::__0");
    }

    #[test]
    fn test_named_cluster_cannot_take_generated_id() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        let zone = session.open_cluster("Zone").unwrap();
        session.close_cluster(zone).unwrap();

        let err = session.open_cluster_with_id("__0", "Impostor").unwrap_err();
        assert!(matches!(err, TopographError::DuplicateId { .. }));
    }

    #[test]
    fn test_ids_with_path_separator_are_rejected() {
        let flag = Cell::new(false);
        let mut session = session(&flag);

        session.add_node("src", "Source", "x").unwrap();
        let err = session.add_node("vpc::alb", "ALB", "aws.network").unwrap_err();
        assert!(matches!(err, TopographError::InvalidId(id) if id == "vpc::alb"));

        let err = session.open_cluster_with_id("account::vpc", "VPC").unwrap_err();
        assert!(matches!(err, TopographError::InvalidId(_)));
        assert_eq!(session.depth(), 0);

        {
            let mut vpc = session.begin_cluster_with_id("vpc", "VPC").unwrap();
            vpc.add_node("alb", "ALB", "aws.network").unwrap();
        }
        session.add_edge(["src"], ["alb"], None).unwrap();
        let graph = session.end_graph().unwrap();
        assert_eq!(graph.node_paths()[&Id::new("alb")], "vpc::alb");
        assert_eq!(graph.nodes_count(), 2);
    }

    #[test]
    fn test_edge_with_empty_side_fails() {
        let flag = Cell::new(false);
        let mut session = session(&flag);
        let a = session.add_node("a", "A", "x").unwrap();

        let err = session
            .add_edge([a], Vec::<NodeRef>::new(), None)
            .unwrap_err();
        assert!(matches!(err, TopographError::InvalidEdge(_)));
        assert_eq!(session.edges_count(), 0);
    }

    #[test]
    fn test_edge_to_cluster_is_a_reference_error() {
        let flag = Cell::new(false);
        let mut session = session(&flag);
        let a = session.add_node("a", "A", "x").unwrap();
        let cluster = session.open_cluster_with_id("group", "Group").unwrap();
        session.close_cluster(cluster).unwrap();

        let err = session.add_edge([a], ["group"], None).unwrap_err();
        assert!(matches!(err, TopographError::Reference(id) if id == "group"));
    }

    #[test]
    fn test_chain() {
        let flag = Cell::new(false);
        let mut session = session(&flag);
        for id in ["users", "igw", "alb"] {
            session.add_node(id, id, "x").unwrap();
        }

        session.add_chain(["users", "igw", "alb"], None).unwrap();
        assert_eq!(session.edges_count(), 2);

        let err = session.add_chain(["alb", "missing"], None).unwrap_err();
        assert!(matches!(err, TopographError::Reference(_)));
        assert_eq!(session.edges_count(), 2);

        let err = session.add_chain(["alb"], None).unwrap_err();
        assert!(matches!(err, TopographError::InvalidEdge(_)));
    }

    #[test]
    fn test_drop_clears_open_flag() {
        let flag = Cell::new(false);
        {
            let _session = session(&flag);
            assert!(flag.get());
        }
        assert!(!flag.get());
    }
}
