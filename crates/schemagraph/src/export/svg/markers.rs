//! Per edge type arrowhead markers.
//!
//! Markers don't inherit the stroke of the path that references them, so
//! each edge type gets its own marker filled with the type color.

use svg::{self, node::element as svg_element};

use schemagraph_core::{color::Color, model::EdgeType};

use super::Svg;

/// Marker id for an edge type, e.g. `arrow-embedded-class`.
pub(super) fn marker_id(edge_type: EdgeType) -> String {
    format!("arrow-{}", edge_type.slug())
}

/// `marker-end` reference for an edge type.
pub(super) fn marker_url(edge_type: EdgeType) -> String {
    format!("url(#{})", marker_id(edge_type))
}

fn create_arrow(edge_type: EdgeType, color: Color) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", marker_id(edge_type))
        .set("viewBox", "0 -5 10 10")
        .set("refX", 15)
        .set("refY", -0.5)
        .set("markerWidth", 6)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("fill", &color)
                .set("d", "M0,-5L10,0L0,5"),
        )
}

impl Svg {
    pub(super) fn render_markers(&self) -> svg_element::Definitions {
        self.palette
            .entries()
            .fold(svg_element::Definitions::new(), |defs, (edge_type, color)| {
                defs.add(create_arrow(edge_type, color))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_ids_are_id_safe() {
        assert_eq!(marker_id(EdgeType::EmbeddedClass), "arrow-embedded-class");
        assert_eq!(marker_url(EdgeType::EdgeIn), "url(#arrow-edge-in)");
    }

    #[test]
    fn test_arrow_shape() {
        let marker = create_arrow(EdgeType::Link, Color::default()).to_string();
        assert!(marker.contains(r#"viewBox="0 -5 10 10""#));
        assert!(marker.contains(r#"refX="15""#));
        assert!(marker.contains(r#"refY="-0.5""#));
        assert!(marker.contains(r#"orient="auto""#));
        assert!(marker.contains(r#"d="M0,-5L10,0L0,5""#));
    }
}
