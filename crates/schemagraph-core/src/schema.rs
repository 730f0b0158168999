//! Serde model of a database schema export.
//!
//! Only the parts of the export that drive the graph are modelled:
//!
//! ```json
//! { "schema": { "classes": [
//!     { "name": "Person",
//!       "super-classes": ["V"],
//!       "properties": [ { "name": "address", "type": "EMBEDDED", "linked-class": "Address" } ] }
//! ] } }
//! ```
//!
//! Everything else in the export (records, indexes, clusters, ...) is ignored.

use std::fmt;

use serde::Deserialize;

/// Root of a schema export document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDocument {
    schema: Schema,
}

impl SchemaDocument {
    pub fn new(classes: Vec<SchemaClass>) -> Self {
        Self {
            schema: Schema { classes },
        }
    }

    /// Returns the classes declared in the schema, in document order.
    pub fn classes(&self) -> &[SchemaClass] {
        &self.schema.classes
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Schema {
    classes: Vec<SchemaClass>,
}

/// A named class of the schema with its parents and properties.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaClass {
    name: String,

    #[serde(rename = "super-classes", default)]
    super_classes: Vec<String>,

    #[serde(default)]
    properties: Vec<PropertyDescriptor>,
}

impl SchemaClass {
    /// Creates a class without parents or properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_classes: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Adds a parent class.
    pub fn with_super_class(mut self, name: impl Into<String>) -> Self {
        self.super_classes.push(name.into());
        self
    }

    /// Adds a property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn super_classes(&self) -> &[String] {
        &self.super_classes
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

/// A property declared on a [`SchemaClass`].
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(rename = "type")]
    property_type: PropertyType,

    #[serde(default)]
    name: String,

    #[serde(rename = "linked-class", default)]
    linked_class: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(property_type: PropertyType, name: impl Into<String>) -> Self {
        Self {
            property_type,
            name: name.into(),
            linked_class: None,
        }
    }

    /// Sets the class this property refers to.
    pub fn with_linked_class(mut self, class: impl Into<String>) -> Self {
        self.linked_class = Some(class.into());
        self
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn linked_class(&self) -> Option<&str> {
        self.linked_class.as_deref()
    }
}

/// Property type vocabulary of the export.
///
/// Names are matched exactly; `EMBEDDEDLIST` is not `EMBEDDED`. Unknown names
/// are preserved in [`PropertyType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PropertyType {
    Boolean,
    Integer,
    Short,
    Long,
    Float,
    Double,
    Datetime,
    String,
    Binary,
    Embedded,
    EmbeddedList,
    EmbeddedSet,
    EmbeddedMap,
    Link,
    LinkList,
    LinkSet,
    LinkMap,
    Byte,
    Transient,
    Date,
    Custom,
    Decimal,
    LinkBag,
    Any,
    Other(String),
}

impl PropertyType {
    /// The name used for this type in the export.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Datetime => "DATETIME",
            Self::String => "STRING",
            Self::Binary => "BINARY",
            Self::Embedded => "EMBEDDED",
            Self::EmbeddedList => "EMBEDDEDLIST",
            Self::EmbeddedSet => "EMBEDDEDSET",
            Self::EmbeddedMap => "EMBEDDEDMAP",
            Self::Link => "LINK",
            Self::LinkList => "LINKLIST",
            Self::LinkSet => "LINKSET",
            Self::LinkMap => "LINKMAP",
            Self::Byte => "BYTE",
            Self::Transient => "TRANSIENT",
            Self::Date => "DATE",
            Self::Custom => "CUSTOM",
            Self::Decimal => "DECIMAL",
            Self::LinkBag => "LINKBAG",
            Self::Any => "ANY",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for PropertyType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "BOOLEAN" => Self::Boolean,
            "INTEGER" => Self::Integer,
            "SHORT" => Self::Short,
            "LONG" => Self::Long,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DATETIME" => Self::Datetime,
            "STRING" => Self::String,
            "BINARY" => Self::Binary,
            "EMBEDDED" => Self::Embedded,
            "EMBEDDEDLIST" => Self::EmbeddedList,
            "EMBEDDEDSET" => Self::EmbeddedSet,
            "EMBEDDEDMAP" => Self::EmbeddedMap,
            "LINK" => Self::Link,
            "LINKLIST" => Self::LinkList,
            "LINKSET" => Self::LinkSet,
            "LINKMAP" => Self::LinkMap,
            "BYTE" => Self::Byte,
            "TRANSIENT" => Self::Transient,
            "DATE" => Self::Date,
            "CUSTOM" => Self::Custom,
            "DECIMAL" => Self::Decimal,
            "LINKBAG" => Self::LinkBag,
            "ANY" => Self::Any,
            _ => Self::Other(name),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
