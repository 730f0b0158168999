//! Configuration types for schemagraph rendering.
//!
//! This module provides configuration structures that control how the graph
//! is derived, laid out and styled. All types implement [`serde::Deserialize`]
//! for loading from external sources; every field has a default, so a partial
//! (or empty) configuration is valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`GraphConfig`] - Class exclusions and the [`DanglingEdgePolicy`].
//! - [`LayoutConfig`] - Force simulation parameters.
//! - [`StyleConfig`] - Visual options such as the palette and background color.
//!
//! # Example
//!
//! ```
//! # use schemagraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.graph().exclusions().iter().any(|c| c == "OUser"));
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use schemagraph_core::{
    color::{CATEGORY10, Color},
    geometry::Size,
};

pub use crate::graph::DanglingEdgePolicy;

/// System classes hidden from the graph unless configured otherwise.
pub const DEFAULT_EXCLUSIONS: [&str; 12] = [
    "E",
    "V",
    "OTriggered",
    "OPermission",
    "OSchedule",
    "OFunction",
    "ORestricted",
    "OSequence",
    "ORole",
    "OUser",
    "OIdentity",
    "_studio",
];

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Graph derivation section.
    #[serde(default)]
    graph: GraphConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(graph: GraphConfig, layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            graph,
            layout,
            style,
        }
    }

    /// Returns the graph configuration.
    pub fn graph(&self) -> &GraphConfig {
        &self.graph
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Controls which classes become nodes and how unresolved edges are handled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    exclusions: Vec<String>,
    dangling_edges: DanglingEdgePolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            dangling_edges: DanglingEdgePolicy::default(),
        }
    }
}

impl GraphConfig {
    /// Creates a graph configuration with an explicit exclusion list.
    pub fn new(exclusions: Vec<String>, dangling_edges: DanglingEdgePolicy) -> Self {
        Self {
            exclusions,
            dangling_edges,
        }
    }

    /// Class names hidden from the graph.
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// What to do with edges whose endpoint is not a node.
    pub fn dangling_edges(&self) -> DanglingEdgePolicy {
        self.dangling_edges
    }
}

/// Force simulation parameters.
///
/// Defaults reproduce the classic d3-force setup: a link force, many-body
/// repulsion of strength -400, and x/y forces pulling toward the origin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    charge_strength: f32,
    link_distance: f32,
    link_iterations: usize,
    center_strength: f32,
    theta: f32,
    distance_min: f32,
    distance_max: Option<f32>,
    alpha_min: f32,
    velocity_decay: f32,
    max_ticks: usize,
    seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            charge_strength: -400.0,
            link_distance: 30.0,
            link_iterations: 1,
            center_strength: 0.1,
            theta: 0.9,
            distance_min: 1.0,
            distance_max: None,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            max_ticks: 1000,
            seed: 1,
        }
    }
}

impl LayoutConfig {
    /// Strength of the many-body force; negative values repel.
    pub fn charge_strength(&self) -> f32 {
        self.charge_strength
    }

    /// Rest length of each link.
    pub fn link_distance(&self) -> f32 {
        self.link_distance
    }

    /// Link constraint passes per tick.
    pub fn link_iterations(&self) -> usize {
        self.link_iterations.max(1)
    }

    /// Strength of the x and y centering forces.
    pub fn center_strength(&self) -> f32 {
        self.center_strength
    }

    /// Barnes–Hut approximation criterion.
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Minimum distance used by the many-body force.
    pub fn distance_min(&self) -> f32 {
        self.distance_min
    }

    /// Maximum distance considered by the many-body force.
    pub fn distance_max(&self) -> f32 {
        self.distance_max.unwrap_or(f32::INFINITY)
    }

    /// The simulation stops once alpha falls below this value.
    pub fn alpha_min(&self) -> f32 {
        self.alpha_min
    }

    /// Alpha decay per tick, chosen so a cold start settles in 300 ticks.
    pub fn alpha_decay(&self) -> f32 {
        1.0 - self.alpha_min.powf(1.0 / 300.0)
    }

    /// Fraction of velocity lost per tick.
    pub fn velocity_decay(&self) -> f32 {
        self.velocity_decay
    }

    /// Upper bound on ticks when running a simulation to completion.
    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    /// Seed for the jiggle applied to coincident nodes.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Visual styling configuration for rendered scenes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    palette: Option<Vec<String>>,
    viewport_width: f32,
    viewport_height: f32,
    node_radius: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            palette: None,
            viewport_width: 2560.0,
            viewport_height: 1440.0,
            node_radius: 4.0,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the categorical scheme used for edge types.
    ///
    /// Falls back to [`CATEGORY10`] when no palette is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette is empty or any entry is not a color.
    pub fn palette(&self) -> Result<Vec<Color>, String> {
        let colors = match &self.palette {
            Some(palette) if palette.is_empty() => {
                return Err("Palette in config must not be empty".to_string());
            }
            Some(palette) => Color::scheme(palette),
            None => Color::scheme(CATEGORY10),
        };
        colors.map_err(|err| format!("Invalid palette in config: {err}"))
    }

    /// Size of the viewport, centered on the origin.
    pub fn viewport(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }

    /// Radius of the node circles.
    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }
}
