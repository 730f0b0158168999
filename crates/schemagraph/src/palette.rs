//! Edge type colors.

use indexmap::IndexMap;

use schemagraph_core::{color::Color, model::EdgeType};

use crate::graph::SchemaGraph;

/// Assigns one color per edge type present in a graph.
///
/// Types are colored in the order they first appear among the edges, cycling
/// through the scheme when there are more types than colors. The legend and
/// the arrow markers are both drawn from the same palette.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: IndexMap<EdgeType, Color>,
}

impl Palette {
    /// Builds the palette for `graph` from a categorical `scheme`.
    ///
    /// An empty scheme colors every type with the default color.
    pub fn new(graph: &SchemaGraph, scheme: &[Color]) -> Self {
        let colors = graph
            .edge_types()
            .into_iter()
            .enumerate()
            .map(|(i, edge_type)| {
                let color = if scheme.is_empty() {
                    Color::default()
                } else {
                    scheme[i % scheme.len()]
                };
                (edge_type, color)
            })
            .collect();
        Self { colors }
    }

    pub fn color(&self, edge_type: EdgeType) -> Option<Color> {
        self.colors.get(&edge_type).copied()
    }

    /// Colored edge types, in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (EdgeType, Color)> + '_ {
        self.colors.iter().map(|(t, c)| (*t, *c))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
