//! Error adapter for converting SchemaGraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Document errors
//! point at the offending line and column of the JSON input; every other
//! error is reported with a code naming the pipeline stage that failed.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use schemagraph::SchemaGraphError;

/// Adapter for a JSON error in the schema document.
pub struct DocumentAdapter<'a> {
    err: &'a serde_json::Error,
    src: &'a str,
}

impl<'a> DocumentAdapter<'a> {
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte span of the error location in the source.
    ///
    /// serde_json reports 1-based lines and columns; a column of 0 means the
    /// error is at the start of the line.
    fn span(&self) -> SourceSpan {
        let line_start: usize = self
            .src
            .split_inclusive('\n')
            .take(self.err.line().saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + self.err.column().saturating_sub(1)).min(self.src.len());
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for DocumentAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for DocumentAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid schema document")
    }
}

impl std::error::Error for DocumentAdapter<'_> {}

impl MietteDiagnostic for DocumentAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("schemagraph::document"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.err.is_data() {
            Some(Box::new(
                "expected an export shaped like {\"schema\": {\"classes\": [...]}}",
            ))
        } else {
            None
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some(self.err.to_string()), self.span());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`SchemaGraphError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a SchemaGraphError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SchemaGraphError::Io(_) => "schemagraph::io",
            SchemaGraphError::Document { .. } => "schemagraph::document",
            SchemaGraphError::Graph(_) => "schemagraph::graph",
            SchemaGraphError::Layout(_) => "schemagraph::layout",
            SchemaGraphError::Config(_) => "schemagraph::config",
            SchemaGraphError::Export(_) => "schemagraph::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SchemaGraphError::Graph(_) => Some(Box::new(
                "set `dangling_edges = \"drop\"` in the [graph] config to skip such edges",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A document error with source location information.
    Document(DocumentAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Document(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Document(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Document(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Document(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Document(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Document(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`SchemaGraphError`] into a reportable error.
pub fn to_reportable(err: &SchemaGraphError) -> Reportable<'_> {
    match err {
        SchemaGraphError::Document { err, src } => {
            Reportable::Document(DocumentAdapter::new(err, src))
        }
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use schemagraph::layout::LayoutError;

    use super::*;

    fn document_error(src: &str) -> SchemaGraphError {
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        SchemaGraphError::new_document_error(err, src)
    }

    #[test]
    fn test_document_error_points_at_location() {
        let src = "{\n  \"schema\": {\n    \"classes\": [,]\n  }\n}";
        let err = document_error(src);

        let reportable = to_reportable(&err);
        let Reportable::Document(adapter) = &reportable else {
            panic!("Expected Document");
        };

        let span = adapter.span();
        assert_eq!(src[..span.offset()].matches('\n').count(), 2, "error is on line 3");
        assert_eq!(span.len(), 1);
        assert_eq!(
            reportable.code().map(|c| c.to_string()),
            Some("schemagraph::document".to_string())
        );
        assert_eq!(reportable.labels().unwrap().count(), 1);
    }

    #[test]
    fn test_document_error_at_end_of_input() {
        let src = "{\"schema\": ";
        let err = document_error(src);

        let Reportable::Document(adapter) = to_reportable(&err) else {
            panic!("Expected Document");
        };
        let span = adapter.span();
        assert!(span.offset() + span.len() <= src.len());
    }

    #[test]
    fn test_non_document_error() {
        let err = SchemaGraphError::Layout(LayoutError::UnknownNode("Ghost".to_string()));

        let reportable = to_reportable(&err);
        match &reportable {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Layout error: node not found: Ghost");
            }
            Reportable::Document(_) => panic!("Expected Error"),
        }
        assert_eq!(
            reportable.code().map(|c| c.to_string()),
            Some("schemagraph::layout".to_string())
        );
        assert!(reportable.source_code().is_none());
    }

    #[test]
    fn test_config_error_code() {
        let err = SchemaGraphError::Config("bad palette".to_string());
        assert_eq!(
            to_reportable(&err).code().map(|c| c.to_string()),
            Some("schemagraph::config".to_string())
        );
    }
}
