//! Export of laid-out schema graphs.
//!
//! This is the last stage of the pipeline:
//!
//! ```text
//! Schema export (JSON)
//!     ↓ parse
//! SchemaDocument
//!     ↓ graph
//! SchemaGraph
//!     ↓ layout (one Frame per tick)
//! Frame
//!     ↓ export (this module)
//! SVG document
//! ```
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. It converts into
//! [`SchemaGraphError::Export`] at the crate boundary.
//!
//! [`SchemaGraphError::Export`]: crate::SchemaGraphError::Export

/// SVG export backend.
pub mod svg;

/// Errors that can occur while exporting a frame.
#[derive(Debug)]
pub enum Error {
    /// The scene could not be drawn from the given frame.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
