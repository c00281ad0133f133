//! Error handling for lab report extraction.

pub mod util;

use std::io;
use std::path::PathBuf;

/// Specialized error type for extraction and consolidation
#[derive(Debug, thiserror::Error)]
pub enum LabExtractError {
    /// Error opening or reading a file
    #[error("IO error at {path}: {context}: {source}")]
    Io {
        path: PathBuf,
        context: String,
        #[source]
        source: io::Error,
    },

    /// A path that should exist or be of a certain kind is not
    #[error("Path error at {path}: {message}")]
    Path { path: PathBuf, message: String },

    /// A rule pattern failed to compile
    #[error("Invalid pattern for rule '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// A date token could not be read as a calendar date
    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    /// A panel row carries a different number of values than its header has dates
    #[error("Panel row '{test}' has {values} values but the header lists {dates} dates")]
    PanelAlignmentMismatch {
        test: String,
        dates: usize,
        values: usize,
    },

    /// A document produced no observations across every pass
    #[error("No matching results found in {document}")]
    EmptyExtraction { document: String },

    /// Lookup of a rule key that is not registered
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything raised by glue code
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LabExtractError {
    /// Wrap an IO error with the path and the purpose of the operation
    pub fn io(path: impl Into<PathBuf>, context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            context: context.into(),
            source,
        }
    }

    /// Whether this error only means "nothing to report" for a document
    #[must_use]
    pub const fn is_empty_extraction(&self) -> bool {
        matches!(self, Self::EmptyExtraction { .. })
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, LabExtractError>;
