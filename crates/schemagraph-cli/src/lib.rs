//! CLI logic for the schemagraph tool.
//!
//! Reads a JSON schema export, lays out its class graph and writes the result
//! as an SVG file.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use schemagraph::{SchemaGraphError, SchemaVisualizer};

/// Run the schemagraph CLI application
///
/// This function processes the input file through the schemagraph pipeline
/// and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `SchemaGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid schema documents
/// - Unresolvable edges or pins
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SchemaGraphError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing schema export"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let visualizer = SchemaVisualizer::new(app_config);
    let document = visualizer.parse(&source)?;
    let graph = visualizer.build_graph(&document)?;
    let svg = visualizer.render_svg(&graph, &args.pins)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
