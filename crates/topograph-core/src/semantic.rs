//! Semantic model of a diagram graph.
//!
//! These types describe a finished, validated graph: a tree of clusters and
//! nodes plus a flat list of edges. They are produced by the builder and are
//! never mutated afterwards.

mod element;
mod graph;

pub use element::{Child, Cluster, Node};
pub use graph::{Direction, Edge, GraphDescription, GraphError};
