//! Rendering collaborators.
//!
//! A [`Renderer`] turns a finished [`GraphDescription`] into the bytes of
//! one artifact. Layout and drawing are left entirely to the renderer; the
//! only contract is the shape of the description.
//!
//! - [`JsonRenderer`] - serializes a structural [`export`](crate::export())
//! - [`GraphvizRenderer`] - DOT source, or PNG/SVG through the `dot`
//!   executable (requires the `graphviz` feature)

mod json;

#[cfg(feature = "graphviz")]
mod graphviz;

pub use json::JsonRenderer;

#[cfg(feature = "graphviz")]
pub use graphviz::GraphvizRenderer;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};

use topograph_core::semantic::GraphDescription;

use crate::{
    config::{OutputFormat, StyleConfig},
    error::TopographError,
    export::ExportFormat,
};

/// Produces an artifact from a finished graph.
pub trait Renderer {
    /// Renders `graph` to the bytes of one artifact.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::Render`] if the underlying tool fails.
    fn render(&self, graph: &GraphDescription) -> Result<Vec<u8>, TopographError>;

    /// The output format this renderer produces.
    fn format(&self) -> OutputFormat;
}

/// Creates the renderer for `format`.
///
/// # Errors
///
/// Returns [`TopographError::Config`] if the style configuration is invalid
/// or the format requires the `graphviz` feature and it is disabled.
pub fn renderer_for(
    format: OutputFormat,
    style: &StyleConfig,
) -> Result<Box<dyn Renderer>, TopographError> {
    let renderer: Box<dyn Renderer> = match format {
        OutputFormat::JsonTree => Box::new(JsonRenderer::new(ExportFormat::Tree)),
        OutputFormat::JsonEdges => Box::new(JsonRenderer::new(ExportFormat::AdjacencyList)),
        #[cfg(feature = "graphviz")]
        OutputFormat::Png | OutputFormat::Svg | OutputFormat::Dot => {
            Box::new(GraphvizRenderer::new(format, style)?)
        }
        #[cfg(not(feature = "graphviz"))]
        OutputFormat::Png | OutputFormat::Svg | OutputFormat::Dot => {
            let _ = style;
            return Err(TopographError::Config(format!(
                "output format `{format}` requires the `graphviz` feature"
            )));
        }
    };
    debug!(format:? = format; "Renderer selected");
    Ok(renderer)
}

/// Derives an artifact file name from a graph title: whitespace-separated
/// words joined with `_`, lowercased, plus the format extension.
///
/// ```
/// # use topograph::{config::OutputFormat, render::default_file_name};
/// let name = default_file_name("AWS EKS  Architecture", OutputFormat::Png);
/// assert_eq!(name.to_str(), Some("aws_eks_architecture.png"));
/// ```
pub fn default_file_name(title: &str, format: OutputFormat) -> PathBuf {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    let stem = if stem.is_empty() {
        "diagram".to_string()
    } else {
        stem
    };
    PathBuf::from(format!("{stem}.{}", format.extension()))
}

/// Writes `bytes` to `path` through a temporary file in the same
/// directory, so a failed write never leaves a partial artifact.
///
/// # Errors
///
/// Returns [`TopographError::Io`] if the file cannot be written or moved
/// into place.
pub fn write_artifact(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), TopographError> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;

    info!(path = path.display().to_string(), bytes = bytes.len(); "Artifact written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            default_file_name("AWS EKS Kubernetes Terraform Architecture", OutputFormat::Png),
            PathBuf::from("aws_eks_kubernetes_terraform_architecture.png")
        );
        assert_eq!(
            default_file_name("Edges", OutputFormat::JsonEdges),
            PathBuf::from("edges.json")
        );
        assert_eq!(
            default_file_name("   ", OutputFormat::Dot),
            PathBuf::from("diagram.dot")
        );
    }

    #[test]
    fn test_write_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_artifact(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        write_artifact(&path, b"[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_artifact_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let err = write_artifact(&path, b"{}").unwrap_err();
        assert!(matches!(err, TopographError::Io(_)));
    }

    #[test]
    fn test_json_renderers_always_available() {
        let style = StyleConfig::default();

        let tree = renderer_for(OutputFormat::JsonTree, &style).unwrap();
        assert_eq!(tree.format(), OutputFormat::JsonTree);

        let edges = renderer_for(OutputFormat::JsonEdges, &style).unwrap();
        assert_eq!(edges.format(), OutputFormat::JsonEdges);
    }
}
