//! Error types for the import pipeline
//!
//! Every failure is fatal for the current import. The variants mirror the
//! stages that can fail: loading the configuration, extracting a path,
//! running a filter chain, validating the record, touching the filesystem,
//! and decoding an existing sink before appending to it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ImportError`.
pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Malformed configuration, unknown variant name, unknown filter name
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Selector syntax error, or a root selector not matching exactly one node
    #[error("extraction error at '{path}': {message}")]
    Extraction { path: String, message: String },

    /// A filter contract was violated by the value it received
    #[error("filter '{filter}' failed: {message}")]
    Filter { filter: String, message: String },

    /// A record invariant failed
    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing sink content cannot be appended to
    #[error("sink {} has invalid content: {message}", path.display())]
    SinkFormat { path: PathBuf, message: String },
}

impl ImportError {
    pub fn config(message: impl Into<String>) -> Self {
        ImportError::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn filter(filter: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::Filter {
            filter: filter.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn sink_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ImportError::SinkFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short stable name of the error kind, used in the CLI diagnostic.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::Config { .. } => "configuration",
            ImportError::Extraction { .. } => "extraction",
            ImportError::Filter { .. } => "filter",
            ImportError::Validation(_) => "validation",
            ImportError::Io { .. } => "io",
            ImportError::SinkFormat { .. } => "sink-format",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ImportError::config("x").kind(), "configuration");
        assert_eq!(ImportError::extraction("div", "x").kind(), "extraction");
        assert_eq!(ImportError::filter("one", "x").kind(), "filter");
        assert_eq!(ImportError::Validation("x".into()).kind(), "validation");
        assert_eq!(ImportError::sink_format("out.json", "x").kind(), "sink-format");
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ImportError::filter("one", "there must be exactly one element");
        assert_eq!(
            err.to_string(),
            "filter 'one' failed: there must be exactly one element"
        );

        let err = ImportError::io(
            "missing.html",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("missing.html"));
    }
}
