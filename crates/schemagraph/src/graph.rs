//! Graph derivation from a schema export.
//!
//! [`GraphBuilder`] turns a [`SchemaDocument`] into a [`SchemaGraph`]: one
//! [`Node`] per visible class and one typed [`Edge`] per relationship.
//!
//! Derivation happens in two steps:
//!
//! 1. [`GraphBuilder::derive`] classifies relationships without looking at
//!    whether their endpoints exist. Edges may point at excluded or unknown
//!    classes.
//! 2. [`GraphBuilder::build`] additionally resolves such dangling edges
//!    according to the configured [`DanglingEdgePolicy`], producing a graph
//!    whose every edge endpoint is a node.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use schemagraph_core::{
    model::{Edge, EdgeType, Node},
    schema::{PropertyDescriptor, PropertyType, SchemaClass, SchemaDocument},
};

/// Errors raised while resolving a derived graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("{edge_type} edge {from} -> {to} refers to `{missing}`, which is not a node")]
    DanglingEdge {
        edge_type: EdgeType,
        from: String,
        to: String,
        missing: String,
    },
}

/// What to do with an edge whose source or target is not a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingEdgePolicy {
    /// Remove the edge and log a warning.
    #[default]
    Drop,
    /// Fail the build with [`GraphError::DanglingEdge`].
    Error,
}

/// Nodes and typed edges derived from a schema export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl SchemaGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in derivation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by class name.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Distinct edge types, in the order they first appear among the edges.
    pub fn edge_types(&self) -> Vec<EdgeType> {
        let mut types = Vec::new();
        for edge in &self.edges {
            if !types.contains(&edge.edge_type()) {
                types.push(edge.edge_type());
            }
        }
        types
    }

    /// Edges whose source or target is not a node.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        let ids: HashSet<&str> = self.nodes.iter().map(Node::id).collect();
        self.edges
            .iter()
            .filter(move |edge| !ids.contains(edge.source()) || !ids.contains(edge.target()))
    }
}

/// Builds a [`SchemaGraph`] from a [`SchemaDocument`].
///
/// # Examples
///
/// ```
/// use schemagraph::graph::GraphBuilder;
/// use schemagraph_core::schema::{SchemaClass, SchemaDocument};
///
/// let doc = SchemaDocument::new(vec![
///     SchemaClass::new("Person").with_super_class("V"),
///     SchemaClass::new("V"),
/// ]);
///
/// let graph = GraphBuilder::new(["V"]).build(&doc).unwrap();
/// assert_eq!(graph.nodes().len(), 1);
/// assert!(graph.edges().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    exclusions: HashSet<String>,
    dangling_edges: DanglingEdgePolicy,
}

impl GraphBuilder {
    /// Creates a builder hiding the given class names.
    pub fn new<I, S>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclusions: exclusions.into_iter().map(Into::into).collect(),
            dangling_edges: DanglingEdgePolicy::default(),
        }
    }

    /// Sets the policy applied by [`GraphBuilder::build`].
    pub fn with_dangling_edges(mut self, policy: DanglingEdgePolicy) -> Self {
        self.dangling_edges = policy;
        self
    }

    pub fn is_excluded(&self, class_name: &str) -> bool {
        self.exclusions.contains(class_name)
    }

    /// Derives nodes and edges without checking edge endpoints.
    ///
    /// A class declared more than once keeps its first declaration.
    pub fn derive(&self, document: &SchemaDocument) -> SchemaGraph {
        let mut seen = HashSet::new();
        let classes: Vec<&SchemaClass> = document
            .classes()
            .iter()
            .filter(|class| !self.is_excluded(class.name()))
            .filter(|class| {
                let first = seen.insert(class.name());
                if !first {
                    warn!(class = class.name(); "Skipping duplicate class declaration");
                }
                first
            })
            .collect();

        let nodes = classes.iter().map(|class| Node::new(class.name())).collect();
        let edges = classes
            .iter()
            .flat_map(|class| self.class_edges(class))
            .collect();

        SchemaGraph { nodes, edges }
    }

    /// Derives the graph and resolves dangling edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingEdge`] for the first unresolved edge when
    /// the policy is [`DanglingEdgePolicy::Error`].
    pub fn build(&self, document: &SchemaDocument) -> Result<SchemaGraph, GraphError> {
        let graph = self.derive(document);
        let graph = self.resolve(graph)?;

        info!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len();
            "Schema graph built"
        );
        Ok(graph)
    }

    fn resolve(&self, graph: SchemaGraph) -> Result<SchemaGraph, GraphError> {
        let mut resolved = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let missing = [edge.source(), edge.target()]
                .into_iter()
                .find(|endpoint| !graph.contains(endpoint));

            let Some(missing) = missing else {
                resolved.push(edge.clone());
                continue;
            };

            match self.dangling_edges {
                DanglingEdgePolicy::Drop => {
                    warn!(edge:% = edge, missing = missing; "Dropping edge to a class that is not a node");
                }
                DanglingEdgePolicy::Error => {
                    return Err(GraphError::DanglingEdge {
                        edge_type: edge.edge_type(),
                        from: edge.source().to_string(),
                        to: edge.target().to_string(),
                        missing: missing.to_string(),
                    });
                }
            }
        }

        Ok(SchemaGraph {
            nodes: graph.nodes,
            edges: resolved,
        })
    }

    fn class_edges(&self, class: &SchemaClass) -> Vec<Edge> {
        let name = class.name();

        let inheritance = class
            .super_classes()
            .iter()
            .filter(|super_class| !self.is_excluded(super_class))
            .map(|super_class| Edge::new(name, super_class.as_str(), EdgeType::Inheritance));

        let embedded = linked(class, EdgeType::EmbeddedClass, |p| {
            *p.property_type() == PropertyType::Embedded
        })
        .map(|target| Edge::new(name, target, EdgeType::EmbeddedClass));

        let edge_in = linked(class, EdgeType::EdgeIn, |p| is_link_named(p, "in"))
            .map(|source| Edge::new(source, name, EdgeType::EdgeIn));

        let edge_out = linked(class, EdgeType::EdgeOut, |p| is_link_named(p, "out"))
            .map(|target| Edge::new(name, target, EdgeType::EdgeOut));

        let link = linked(class, EdgeType::Link, |p| {
            *p.property_type() == PropertyType::Link && p.name() != "in" && p.name() != "out"
        })
        .map(|target| Edge::new(name, target, EdgeType::Link));

        let edges: Vec<Edge> = inheritance
            .chain(embedded)
            .chain(edge_in)
            .chain(edge_out)
            .chain(link)
            .collect();

        debug!(class = name, edges = edges.len(); "Derived class edges");
        edges
    }
}

fn is_link_named(property: &PropertyDescriptor, name: &str) -> bool {
    *property.property_type() == PropertyType::Link && property.name() == name
}

/// Linked classes of the properties matching `filter`.
///
/// Matching properties without a linked class cannot be drawn and are skipped.
fn linked<'a>(
    class: &'a SchemaClass,
    edge_type: EdgeType,
    filter: impl Fn(&PropertyDescriptor) -> bool + 'a,
) -> impl Iterator<Item = &'a str> + 'a {
    class
        .properties()
        .iter()
        .filter(move |property| filter(property))
        .filter_map(move |property| {
            let linked_class = property.linked_class();
            if linked_class.is_none() {
                warn!(
                    class = class.name(),
                    property = property.name(),
                    edge_type:% = edge_type;
                    "Skipping property without linked class"
                );
            }
            linked_class
        })
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use schemagraph_core::schema::PropertyDescriptor;

    use super::*;

    const NAMES: [&str; 8] = ["E", "V", "OUser", "_studio", "A", "B", "C", "D"];
    const EXCLUDED: [&str; 4] = ["E", "V", "OUser", "_studio"];

    fn name() -> impl Strategy<Value = String> {
        prop::sample::select(NAMES.to_vec()).prop_map(str::to_string)
    }

    fn property() -> impl Strategy<Value = PropertyDescriptor> {
        let property_type = prop::sample::select(vec!["LINK", "EMBEDDED", "STRING", "LINKLIST"]);
        let property_name = prop::sample::select(vec!["in", "out", "friend", ""]);
        (property_type, property_name, name()).prop_map(|(t, n, target)| {
            PropertyDescriptor::new(PropertyType::from(t.to_string()), n).with_linked_class(target)
        })
    }

    fn class() -> impl Strategy<Value = SchemaClass> {
        (
            name(),
            prop::collection::vec(name(), 0..3),
            prop::collection::vec(property(), 0..4),
        )
            .prop_map(|(name, supers, properties)| {
                let class = supers
                    .into_iter()
                    .fold(SchemaClass::new(name), SchemaClass::with_super_class);
                properties
                    .into_iter()
                    .fold(class, SchemaClass::with_property)
            })
    }

    fn document() -> impl Strategy<Value = SchemaDocument> {
        prop::collection::vec(class(), 0..8).prop_map(SchemaDocument::new)
    }

    proptest! {
        #[test]
        fn prop_no_node_is_excluded(doc in document()) {
            let graph = GraphBuilder::new(EXCLUDED).derive(&doc);
            for node in graph.nodes() {
                prop_assert!(!EXCLUDED.contains(&node.id()));
            }
        }

        #[test]
        fn prop_node_ids_are_unique(doc in document()) {
            let graph = GraphBuilder::new(EXCLUDED).derive(&doc);
            let ids: HashSet<&str> = graph.nodes().iter().map(Node::id).collect();
            prop_assert_eq!(ids.len(), graph.nodes().len());
        }

        #[test]
        fn prop_inheritance_edges_avoid_excluded(doc in document()) {
            let graph = GraphBuilder::new(EXCLUDED).derive(&doc);
            for edge in graph.edges().iter().filter(|e| e.edge_type() == EdgeType::Inheritance) {
                prop_assert!(!EXCLUDED.contains(&edge.source()));
                prop_assert!(!EXCLUDED.contains(&edge.target()));
            }
        }

        #[test]
        fn prop_built_graph_has_no_dangling_edges(doc in document()) {
            let graph = GraphBuilder::new(EXCLUDED).build(&doc).unwrap();
            prop_assert_eq!(graph.dangling_edges().count(), 0);
        }

        #[test]
        fn prop_edge_types_match_present_types(doc in document()) {
            let graph = GraphBuilder::new(EXCLUDED).derive(&doc);
            let present: HashSet<EdgeType> = graph.edges().iter().map(Edge::edge_type).collect();
            let listed: HashSet<EdgeType> = graph.edge_types().into_iter().collect();
            prop_assert_eq!(present, listed);
        }
    }
}
