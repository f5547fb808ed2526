//! Topograph - declarative diagram graphs for architecture pictures.
//!
//! A build session assembles labeled nodes inside nested clusters and
//! connects them with directed, possibly fan-out edges. Every call is
//! validated as it is made, and the finished graph is handed to a rendering
//! collaborator as an immutable [`GraphDescription`](semantic::GraphDescription).

pub mod config;
pub mod render;

mod builder;
mod error;
mod export;

pub use topograph_core::{color, identifier, semantic};

pub use builder::{ClusterRef, ClusterScope, GraphSession, NodeRef};
pub use error::TopographError;
pub use export::{EdgeRecord, Export, ExportFormat, TreeEdge, TreeEntry, TreeExport, export};

use std::{cell::Cell, path::Path};

use log::{debug, info};

use config::AppConfig;
use semantic::{Direction, GraphDescription};

/// Entry point for building and rendering diagram graphs.
///
/// At most one [`GraphSession`] per builder is open at a time. The session
/// is released when it ends or is dropped, after which the builder can start
/// another one.
///
/// # Examples
///
/// ```rust
/// use topograph::{DiagramBuilder, TopographError, semantic::Direction};
///
/// # fn main() -> Result<(), TopographError> {
/// let builder = DiagramBuilder::default();
///
/// let mut session = builder.begin_graph("Ingress", Direction::TopToBottom)?;
/// let users = session.add_node("users", "Users", "onprem.client")?;
/// let alb = {
///     let mut vpc = session.begin_cluster_with_id("vpc", "VPC")?;
///     vpc.add_node("alb", "Application Load Balancer", "aws.network")?
/// };
/// session.add_edge([users], [alb], None)?;
///
/// let graph = session.end_graph()?;
/// assert_eq!(graph.nodes_count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
    session_open: Cell<bool>,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Render and style settings handed to renderers
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            session_open: Cell::new(false),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns `true` while a session started by this builder is open.
    pub fn is_session_open(&self) -> bool {
        self.session_open.get()
    }

    /// Starts a new build session.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::State`] if a session from this builder is
    /// already open.
    pub fn begin_graph(
        &self,
        title: impl Into<String>,
        direction: Direction,
    ) -> Result<GraphSession<'_>, TopographError> {
        let title = title.into();
        if self.session_open.replace(true) {
            return Err(TopographError::State(format!(
                "cannot begin graph `{title}`: another session is still open"
            )));
        }

        info!(title = title.as_str(), direction:? = direction; "Graph session started");
        Ok(GraphSession::new(&self.session_open, title, direction))
    }

    /// Renders `graph` with the configured output format and returns the
    /// artifact bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::Config`] for an unusable configuration and
    /// [`TopographError::Render`] if the renderer fails.
    pub fn render(&self, graph: &GraphDescription) -> Result<Vec<u8>, TopographError> {
        let format = self.config.render().format();
        info!(title = graph.title(), format:? = format; "Rendering graph");

        let renderer = render::renderer_for(format, self.config.style())?;
        let bytes = renderer.render(graph)?;

        debug!(bytes = bytes.len(); "Graph rendered");
        Ok(bytes)
    }

    /// Renders `graph` and writes the artifact to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`DiagramBuilder::render`], plus [`TopographError::Io`] if the
    /// artifact cannot be written.
    pub fn render_to_file(
        &self,
        graph: &GraphDescription,
        path: impl AsRef<Path>,
    ) -> Result<(), TopographError> {
        let bytes = self.render(graph)?;
        render::write_artifact(path, &bytes)
    }
}
