//! Guard that keeps a cluster open for the duration of a lexical scope.

use std::ops::{Deref, DerefMut};

use log::warn;

use super::{ClusterRef, GraphSession};
use crate::error::TopographError;

/// An open cluster that is sealed when the guard goes out of scope.
///
/// The guard dereferences to the [`GraphSession`], so nodes, edges and nested
/// clusters are added through it while it lives. The cluster is closed on
/// every exit path: normal end of scope, early return through `?`, or
/// unwinding.
///
/// ```
/// use topograph::{DiagramBuilder, TopographError, semantic::Direction};
///
/// # fn main() -> Result<(), TopographError> {
/// let builder = DiagramBuilder::default();
/// let mut session = builder.begin_graph("Zones", Direction::LeftToRight)?;
/// {
///     let mut vpc = session.begin_cluster_with_id("vpc", "VPC (10.0.0.0/16)")?;
///     let mut zone = vpc.begin_cluster("Availability Zone A")?;
///     zone.add_node("nat_a", "NAT-A", "aws.network")?;
/// }
/// assert_eq!(session.depth(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClusterScope<'s, 'b> {
    session: &'s mut GraphSession<'b>,
    cluster: ClusterRef,
    closed: bool,
}

impl<'s, 'b> ClusterScope<'s, 'b> {
    pub(super) fn new(session: &'s mut GraphSession<'b>, cluster: ClusterRef) -> Self {
        Self {
            session,
            cluster,
            closed: false,
        }
    }

    /// Returns the handle of the cluster this guard keeps open.
    pub fn cluster(&self) -> ClusterRef {
        self.cluster
    }

    /// Closes the cluster now and reports failures instead of logging them.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::State`] if a cluster opened inside this one
    /// without a guard is still open.
    pub fn close(mut self) -> Result<(), TopographError> {
        self.closed = true;
        self.session.close_cluster(self.cluster)
    }
}

impl<'b> Deref for ClusterScope<'_, 'b> {
    type Target = GraphSession<'b>;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl DerefMut for ClusterScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl Drop for ClusterScope<'_, '_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.session.close_cluster(self.cluster) {
            warn!(cluster = self.cluster.id().to_string(), err:err; "Cluster left open");
        }
    }
}
