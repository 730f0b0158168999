//! Graph model derived from a schema export.
//!
//! A [`Node`] stands for one schema class and an [`Edge`] for one relationship
//! between two classes, classified by its [`EdgeType`]. Endpoints are class
//! names; layout backends resolve them to nodes by [`Node::id`].

use std::fmt;

/// A schema class shown in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    id: String,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The owning class name.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Why two classes are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    /// The source class extends the target class.
    Inheritance,
    /// The source class embeds a record of the target class.
    EmbeddedClass,
    /// An edge class whose `in` vertex is the source class.
    EdgeIn,
    /// An edge class whose `out` vertex is the target class.
    EdgeOut,
    /// Any other link property.
    Link,
}

impl EdgeType {
    /// All edge types in derivation order.
    pub const ALL: [EdgeType; 5] = [
        EdgeType::Inheritance,
        EdgeType::EmbeddedClass,
        EdgeType::EdgeIn,
        EdgeType::EdgeOut,
        EdgeType::Link,
    ];

    /// Human readable label, as shown in legends.
    pub fn label(self) -> &'static str {
        match self {
            Self::Inheritance => "Inheritance",
            Self::EmbeddedClass => "Embedded class",
            Self::EdgeIn => "Edge in",
            Self::EdgeOut => "Edge out",
            Self::Link => "Link",
        }
    }

    /// Identifier-safe name, usable in SVG ids and URL fragments.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Inheritance => "inheritance",
            Self::EmbeddedClass => "embedded-class",
            Self::EdgeIn => "edge-in",
            Self::EdgeOut => "edge-out",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed, directed relationship between two classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    source: String,
    target: String,
    edge_type: EdgeType,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.edge_type)
    }
}
