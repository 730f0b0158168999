//! SVG rendering of a [`Frame`].
//!
//! The scene is drawn in a fixed viewport centered on the origin, so frames
//! of a running layout can be swapped in place without changing the view.
//! From bottom to top it holds an optional background, the legend, the arrow
//! marker definitions, the links and the nodes.

mod legend;
mod markers;
mod scene;

use log::debug;
use svg::{self, node::element as svg_element};

use schemagraph_core::{
    color::Color,
    geometry::{Bounds, Size},
};

use super::Error;
use crate::{config::StyleConfig, graph::SchemaGraph, layout::Frame, palette::Palette};

/// SVG renderer for one graph's frames.
#[derive(Debug, Clone)]
pub struct Svg {
    palette: Palette,
    background_color: Option<Color>,
    viewport: Size,
    node_radius: f32,
}

impl Svg {
    /// Creates a renderer drawing edge types with `palette`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the configured background color is invalid.
    pub fn new(palette: Palette, style: &StyleConfig) -> Result<Self, Error> {
        let background_color = style.background_color().map_err(Error::Render)?;
        Ok(Self {
            palette,
            background_color,
            viewport: style.viewport(),
            node_radius: style.node_radius(),
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The visible region, centered on the origin.
    pub fn view_bounds(&self) -> Bounds {
        self.viewport.centered_bounds()
    }

    /// Renders `graph` with node positions taken from `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the frame has no position for a node that
    /// the graph references.
    pub fn render(&self, graph: &SchemaGraph, frame: &Frame) -> Result<svg::Document, Error> {
        let view = self.view_bounds();

        let mut doc = svg::Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view.min_x(),
                    view.min_y(),
                    view.width(),
                    view.height()
                ),
            )
            .set("style", "font: 10px sans-serif;");

        if let Some(color) = &self.background_color {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", view.min_x())
                    .set("y", view.min_y())
                    .set("width", view.width())
                    .set("height", view.height())
                    .set("fill", color),
            );
        }

        doc = doc
            .add(self.render_legend(view))
            .add(self.render_markers())
            .add(self.render_links(graph, frame)?)
            .add(self.render_nodes(graph, frame)?);

        debug!(tick = frame.tick(), nodes = graph.nodes().len(); "Frame rendered");
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use schemagraph_core::{
        color::CATEGORY10,
        geometry::Point,
        model::{Edge, EdgeType, Node},
    };

    use indexmap::IndexMap;

    use super::*;

    fn graph() -> SchemaGraph {
        SchemaGraph::new(
            vec![Node::new("Person"), Node::new("Company"), Node::new("Address")],
            vec![
                Edge::new("Person", "Company", EdgeType::Link),
                Edge::new("Company", "Address", EdgeType::EmbeddedClass),
                Edge::new("Person", "Address", EdgeType::Link),
            ],
        )
    }

    fn frame() -> Frame {
        let positions = IndexMap::from([
            ("Person".to_string(), Point::new(0.0, 0.0)),
            ("Company".to_string(), Point::new(40.0, -10.0)),
            ("Address".to_string(), Point::new(-30.0, 25.5)),
        ]);
        Frame::new(3, 0.5, positions)
    }

    fn render(style: &StyleConfig) -> String {
        let graph = graph();
        let palette = Palette::new(&graph, &Color::scheme(CATEGORY10).unwrap());
        Svg::new(palette, style)
            .unwrap()
            .render(&graph, &frame())
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_view_box_is_centered() {
        let svg = render(&StyleConfig::default());
        assert!(svg.contains(r#"viewBox="-1280 -720 2560 1440""#), "{svg}");
        assert!(svg.contains("font: 10px sans-serif;"));
    }

    #[test]
    fn test_one_marker_per_present_type() {
        let svg = render(&StyleConfig::default());
        assert_eq!(svg.matches("<marker").count(), 2);
        assert!(svg.contains(r#"id="arrow-link""#));
        assert!(svg.contains(r#"id="arrow-embedded-class""#));
    }

    #[test]
    fn test_one_path_per_edge() {
        let svg = render(&StyleConfig::default());
        assert_eq!(svg.matches("marker-end=").count(), 3);
        assert!(svg.contains("M0,0 A0,0 0 0,1 40,-10"), "{svg}");
    }

    #[test]
    fn test_one_group_per_node() {
        let svg = render(&StyleConfig::default());
        assert_eq!(svg.matches("transform=\"translate(").count(), 3);
        assert!(svg.contains("translate(-30,25.5)"));
        assert_eq!(svg.matches("<circle").count(), 3 + 2, "nodes plus legend dots");
    }

    #[test]
    fn test_background_is_optional() {
        assert!(!render(&StyleConfig::default()).contains("<rect"));

        let style: StyleConfig =
            serde_json::from_str(r#"{"background_color": "white"}"#).unwrap();
        assert!(render(&style).contains("<rect"));
    }

    #[test]
    fn test_missing_position_is_an_error() {
        let graph = graph();
        let svg = Svg::new(Palette::default(), &StyleConfig::default()).unwrap();
        let err = svg.render(&graph, &Frame::default()).unwrap_err();
        assert!(err.to_string().contains("Person"));
    }
}
