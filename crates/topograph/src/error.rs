//! Error types for Topograph operations.
//!
//! [`TopographError`] covers both the build phase (scope discipline,
//! identifier uniqueness, edge references) and the rendering phase
//! (configuration, I/O, external renderer failures).

use std::io;

use thiserror::Error;

use topograph_core::{identifier::Id, semantic::GraphError};

/// The main error type for Topograph operations.
///
/// Build errors are raised synchronously by the offending call, which leaves
/// the session as it was. Nothing invalid is ever handed to a renderer.
#[derive(Debug, Error)]
pub enum TopographError {
    #[error("State error: {0}")]
    State(String),

    #[error("Duplicate identifier `{id}`: already declared as `{existing}`")]
    DuplicateId { id: Id, existing: Id },

    #[error("Invalid identifier `{0}`: identifiers must be non-empty and must not contain `::`")]
    InvalidId(Id),

    #[error("Reference error: `{0}` is not a declared node")]
    Reference(Id),

    #[error("Invalid edge: {0}")]
    InvalidEdge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Render error: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TopographError {
    pub(crate) fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }
}

impl From<GraphError> for TopographError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::InvalidId(id) => Self::InvalidId(id),
            GraphError::DuplicateNode { id, existing }
            | GraphError::DuplicateCluster { id, existing } => Self::DuplicateId { id, existing },
            GraphError::UnknownNode(id) => Self::Reference(id),
            GraphError::EmptyEdge(_) => Self::InvalidEdge(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for TopographError {
    fn from(error: serde_json::Error) -> Self {
        Self::Render(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_message() {
        let err = TopographError::DuplicateId {
            id: Id::new("nat_a"),
            existing: Id::new("vpc::az_a::nat_a"),
        };

        assert_eq!(
            err.to_string(),
            "Duplicate identifier `nat_a`: already declared as `vpc::az_a::nat_a`"
        );
    }

    #[test]
    fn test_reference_message() {
        let err = TopographError::Reference(Id::new("z"));
        assert_eq!(err.to_string(), "Reference error: `z` is not a declared node");
    }

    #[test]
    fn test_io_conversion() {
        let err: TopographError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, TopographError::Io(_)));
    }

    #[test]
    fn test_render_keeps_source() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "dot: command not found");
        let err = TopographError::Render(Box::new(cause));

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "dot: command not found");
    }

    #[test]
    fn test_graph_error_conversion() {
        let err: TopographError = GraphError::UnknownNode(Id::new("ghost")).into();
        assert!(matches!(err, TopographError::Reference(id) if id == "ghost"));

        let err: TopographError = GraphError::EmptyEdge(2).into();
        assert!(matches!(err, TopographError::InvalidEdge(msg) if msg.contains("#2")));
    }
}
