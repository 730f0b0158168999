//! Legend listing every edge type with its color.

use svg::{self, node::element as svg_element};

use schemagraph_core::geometry::Bounds;

use super::Svg;

const INSET: f32 = 100.0;
const ROW_HEIGHT: f32 = 25.0;
const DOT_RADIUS: f32 = 7.0;
const LABEL_OFFSET: f32 = 20.0;

impl Svg {
    /// One colored dot and label per palette entry, stacked in the top-left
    /// corner of `view`.
    pub(super) fn render_legend(&self, view: Bounds) -> svg_element::Group {
        let x = view.min_x() + INSET;

        self.palette
            .entries()
            .enumerate()
            .fold(svg_element::Group::new(), |group, (i, (edge_type, color))| {
                let y = view.min_y() + INSET + i as f32 * ROW_HEIGHT;

                let dot = svg_element::Circle::new()
                    .set("cx", x)
                    .set("cy", y)
                    .set("r", DOT_RADIUS)
                    .set("fill", &color);
                let label = svg_element::Text::new(edge_type.label())
                    .set("x", x + LABEL_OFFSET)
                    .set("y", y)
                    .set("fill", &color)
                    .set("text-anchor", "start")
                    .set("alignment-baseline", "middle");

                group.add(dot).add(label)
            })
    }
}
