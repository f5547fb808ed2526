//! Error adapter for converting TopographError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use topograph::TopographError;

/// Adapter that renders a [`TopographError`] as a miette diagnostic with a
/// stable code and, where one applies, a hint.
pub struct ErrorAdapter<'a>(pub &'a TopographError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TopographError::State(_) => "topograph::state",
            TopographError::DuplicateId { .. } => "topograph::duplicate_id",
            TopographError::InvalidId(_) => "topograph::invalid_id",
            TopographError::Reference(_) => "topograph::reference",
            TopographError::InvalidEdge(_) => "topograph::invalid_edge",
            TopographError::Config(_) => "topograph::config",
            TopographError::Io(_) => "topograph::io",
            TopographError::Render(_) => "topograph::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TopographError::State(_) => {
                "every cluster opened in a session must be closed before the graph ends"
            }
            TopographError::DuplicateId { .. } => {
                "node and cluster identifiers share one namespace across the whole graph"
            }
            TopographError::InvalidId(_) => {
                "`::` separates path segments; pick an identifier without it"
            }
            TopographError::Reference(_) => "declare a node before connecting it",
            TopographError::Render(_) => {
                "image output requires the Graphviz `dot` executable on PATH; try --format dot"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

#[cfg(test)]
mod tests {
    use topograph::identifier::Id;

    use super::*;

    #[test]
    fn test_codes() {
        let err = TopographError::Reference(Id::new("z"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "topograph::reference");
        assert_eq!(
            adapter.help().unwrap().to_string(),
            "declare a node before connecting it"
        );
        assert_eq!(
            adapter.to_string(),
            "Reference error: `z` is not a declared node"
        );
    }

    #[test]
    fn test_no_help_for_config() {
        let err = TopographError::Config("bad color".to_string());
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "topograph::config");
        assert!(adapter.help().is_none());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = TopographError::State("cluster `__0` left open".to_string());
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &ErrorAdapter(&err))
            .unwrap();

        assert!(out.contains("topograph::state"));
        assert!(out.contains("cluster `__0` left open"));
    }

    #[test]
    fn test_render_cause_is_kept() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "dot not found");
        let err = TopographError::Render(Box::new(cause));
        let adapter = ErrorAdapter(&err);

        let source = std::error::Error::source(&adapter).unwrap();
        assert_eq!(source.to_string(), "dot not found");
    }
}
