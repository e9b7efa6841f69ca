//! Unified error types for granta-bom.
//!
//! All failures surface synchronously through [`BomError`]; nothing is
//! retried or suppressed internally. Lenient-mode element skipping is not an
//! error and never appears here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for granta-bom operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BomError {
    /// Input is not well-formed XML. Also raised for documents carrying a
    /// DOCTYPE declaration, which this crate refuses to process.
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// The root element is not a `PartsEco` element in a supported Eco
    /// schema namespace.
    #[error("Unsupported BoM schema: root element {{{namespace}}}{element}")]
    UnsupportedSchema { namespace: String, element: String },

    /// Strict-mode violation: the document contains content this model
    /// cannot represent. Carries the slash-joined path to the offending
    /// element.
    #[error("Unable to deserialize BoM content at '{path}': {message}")]
    Deserialization { path: String, message: String },

    /// A reference builder was asked to produce an ambiguous or empty
    /// reference.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A mutually-exclusive field group has the wrong number of members
    /// populated.
    #[error("Choice group violation at '{path}': {message}")]
    ChoiceGroupViolation { path: String, message: String },

    /// IO errors with path context.
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result type for granta-bom operations.
pub type Result<T> = std::result::Result<T, BomError>;

impl BomError {
    /// Create a malformed-XML error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedXml(message.into())
    }

    /// Create a strict-mode deserialization error with an element path.
    pub fn deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-reference error.
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference(message.into())
    }

    /// Create a choice-group violation with an element path.
    pub fn choice_violation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChoiceGroupViolation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }
}

impl From<std::io::Error> for BomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization_error_carries_path() {
        let err = BomError::deserialization("PartsEco/Components/Part", "unknown element 'Foo'");
        let display = err.to_string();
        assert!(display.contains("PartsEco/Components/Part"), "{display}");
        assert!(display.contains("Foo"), "{display}");
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = BomError::io("/path/to/bom.xml", io_err);
        assert!(err.to_string().contains("/path/to/bom.xml"));
    }

    #[test]
    fn test_unsupported_schema_display() {
        let err = BomError::UnsupportedSchema {
            namespace: "http://example.com/unknown".to_string(),
            element: "PartsEco".to_string(),
        };
        assert!(err.to_string().contains("http://example.com/unknown"));
    }
}
