//! CLI logic for the Topograph diagram tool.
//!
//! Builds the reference architecture and hands it to the configured
//! renderer.

pub mod error_adapter;

mod architecture;
mod args;
mod config;

pub use args::Args;

use std::path::PathBuf;

use log::info;

use topograph::{DiagramBuilder, TopographError, render};

/// Run the Topograph CLI application
///
/// Builds the architecture graph and writes the rendered artifact to the
/// output path, or to a file named after the diagram title.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `TopographError` for:
/// - Configuration loading errors
/// - Graph construction errors
/// - Rendering errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), TopographError> {
    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(format) = args.format {
        app_config = app_config.with_format(format);
    }
    let format = app_config.render().format();

    let output = args.output.as_ref().map_or_else(
        || render::default_file_name(architecture::TITLE, format),
        PathBuf::from,
    );
    info!(
        output_path = output.display().to_string(),
        format:? = format;
        "Processing diagram"
    );

    let builder = DiagramBuilder::new(app_config);
    let graph = architecture::build(&builder)?;
    info!(
        nodes = graph.nodes_count(),
        edges = graph.edges().len();
        "Architecture graph built"
    );

    builder.render_to_file(&graph, &output)?;

    info!(output_file = output.display().to_string(); "Diagram exported successfully");

    Ok(())
}
