//! Error types for schemagraph operations.
//!
//! This module provides the main error type [`SchemaGraphError`] which wraps
//! the error conditions of each pipeline stage.

use std::io;

use thiserror::Error;

use crate::{graph::GraphError, layout::LayoutError};

/// The main error type for schemagraph operations.
///
/// # Diagnostic Variants
///
/// The `Document` variant keeps the source text next to the JSON error so the
/// failing line and column can be shown in rich error reports.
#[derive(Debug, Error)]
pub enum SchemaGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid schema document: {err}")]
    Document { err: serde_json::Error, src: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for SchemaGraphError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl SchemaGraphError {
    /// Create a new `Document` error with the associated source text.
    pub fn new_document_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Document {
            err,
            src: src.into(),
        }
    }
}
