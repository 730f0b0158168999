//! Links and nodes of the scene.

use svg::{self, node::element as svg_element};

use schemagraph_core::geometry::Point;

use super::{Svg, markers::marker_url};
use crate::{export::Error, graph::SchemaGraph, layout::Frame};

const LABEL_X: f32 = 8.0;
const LABEL_Y: &str = "0.31em";

fn position(frame: &Frame, id: &str) -> Result<Point, Error> {
    frame
        .position(id)
        .ok_or_else(|| Error::Render(format!("no position for node `{id}`")))
}

/// Zero-radius arc from `source` to `target`, drawn as a straight line.
fn link_arc(source: Point, target: Point) -> String {
    format!(
        "M{},{} A0,0 0 0,1 {},{}",
        source.x(),
        source.y(),
        target.x(),
        target.y()
    )
}

impl Svg {
    pub(super) fn render_links(
        &self,
        graph: &SchemaGraph,
        frame: &Frame,
    ) -> Result<svg_element::Group, Error> {
        let mut group = svg_element::Group::new()
            .set("fill", "none")
            .set("stroke-width", 1.5);

        for edge in graph.edges() {
            let source = position(frame, edge.source())?;
            let target = position(frame, edge.target())?;
            let color = self.palette.color(edge.edge_type()).unwrap_or_default();

            group = group.add(
                svg_element::Path::new()
                    .set("d", link_arc(source, target))
                    .set("stroke", &color)
                    .set("marker-end", marker_url(edge.edge_type())),
            );
        }
        Ok(group)
    }

    pub(super) fn render_nodes(
        &self,
        graph: &SchemaGraph,
        frame: &Frame,
    ) -> Result<svg_element::Group, Error> {
        let mut group = svg_element::Group::new()
            .set("fill", "currentColor")
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round");

        for node in graph.nodes() {
            let p = position(frame, node.id())?;

            let circle = svg_element::Circle::new()
                .set("stroke", "white")
                .set("stroke-width", 1.5)
                .set("r", self.node_radius);
            // White outline behind the label keeps it readable over links.
            let halo = svg_element::Text::new(node.id())
                .set("x", LABEL_X)
                .set("y", LABEL_Y)
                .set("fill", "none")
                .set("stroke", "white")
                .set("stroke-width", 3);
            let label = svg_element::Text::new(node.id())
                .set("x", LABEL_X)
                .set("y", LABEL_Y);

            group = group.add(
                svg_element::Group::new()
                    .set("transform", format!("translate({},{})", p.x(), p.y()))
                    .add(circle)
                    .add(halo)
                    .add(label),
            );
        }
        Ok(group)
    }
}
