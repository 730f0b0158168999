//! Schemagraph - Force-directed class diagrams of database schema exports.
//!
//! Reads the JSON schema export of a graph database, derives a graph of its
//! classes and their relationships (inheritance, embedded classes, edge
//! endpoints and links), lays it out with a force simulation and renders it
//! to SVG.

pub mod config;
pub mod driver;
pub mod export;
pub mod graph;
pub mod layout;
pub mod palette;

mod error;

pub use schemagraph_core::{color, geometry, model, schema};

pub use error::SchemaGraphError;

use log::{debug, info, trace};

use config::AppConfig;
use driver::Driver;
use graph::{GraphBuilder, SchemaGraph};
use layout::{LayoutBackend, Pin, Simulation};
use schema::SchemaDocument;

/// Entry point for parsing, laying out and rendering schema exports.
///
/// # Examples
///
/// ```rust
/// use schemagraph::{SchemaVisualizer, config::AppConfig};
///
/// let source = r#"{"schema": {"classes": [
///     {"name": "Person", "properties": [
///         {"name": "employer", "type": "LINK", "linked-class": "Company"}
///     ]},
///     {"name": "Company"}
/// ]}}"#;
///
/// let visualizer = SchemaVisualizer::new(AppConfig::default());
/// let document = visualizer.parse(source).expect("Failed to parse");
/// let graph = visualizer.build_graph(&document).expect("Failed to build graph");
/// assert_eq!(graph.edges().len(), 1);
///
/// let svg = visualizer.render_svg(&graph, &[]).expect("Failed to render");
/// assert!(svg.contains("Person"));
/// ```
#[derive(Debug, Default)]
pub struct SchemaVisualizer {
    config: AppConfig,
}

impl SchemaVisualizer {
    /// Create a new visualizer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON schema export.
    ///
    /// Fields the model does not know about are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGraphError::Document`] if `source` is not valid JSON or
    /// lacks `schema.classes`.
    pub fn parse(&self, source: &str) -> Result<SchemaDocument, SchemaGraphError> {
        info!("Parsing schema document");

        let document: SchemaDocument = serde_json::from_str(source)
            .map_err(|err| SchemaGraphError::new_document_error(err, source))?;

        debug!(classes = document.classes().len(); "Schema document parsed");
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Derive the class graph, applying the configured exclusions and
    /// dangling edge policy.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGraphError::Graph`] if an edge cannot be resolved and
    /// the policy is `error`.
    pub fn build_graph(
        &self,
        document: &SchemaDocument,
    ) -> Result<SchemaGraph, SchemaGraphError> {
        let graph_config = self.config.graph();
        let graph = GraphBuilder::new(graph_config.exclusions().iter().cloned())
            .with_dangling_edges(graph_config.dangling_edges())
            .build(document)?;
        Ok(graph)
    }

    /// Create a driver running the force simulation over `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGraphError::Layout`] if an edge endpoint is not a node,
    /// or [`SchemaGraphError::Config`] if the style configuration is invalid.
    pub fn driver<'g>(
        &self,
        graph: &'g SchemaGraph,
    ) -> Result<Driver<'g, Simulation>, SchemaGraphError> {
        let simulation = Simulation::compute_layout(graph, self.config.layout())?;
        Driver::new(graph, simulation, self.config.style())
    }

    /// Lay out `graph` until it settles and render the final frame to SVG.
    ///
    /// Each pin fixes a class at a position for the whole run.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGraphError::Layout`] if a pin names a class that is not
    /// a node, or any error of [`SchemaVisualizer::driver`].
    pub fn render_svg(
        &self,
        graph: &SchemaGraph,
        pins: &[Pin],
    ) -> Result<String, SchemaGraphError> {
        let mut driver = self.driver(graph)?;
        for pin in pins {
            driver.pin(pin.id(), pin.position())?;
        }

        info!(nodes = graph.nodes().len(), pins = pins.len(); "Running layout");
        driver.run(self.config.layout().max_ticks(), |frame| {
            trace!(tick = frame.tick(), alpha = frame.alpha(); "Frame");
        });

        let svg = driver.render()?.to_string();
        info!("SVG rendered successfully");
        Ok(svg)
    }
}
