//! Error types for the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipeline operations.
///
/// Every variant aborts the run; nothing is written once one is raised.
#[derive(Error, Debug)]
pub enum Error {
    /// Ambiguous or missing category mapping input, or invalid settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An expected field is absent, usually a wrong schema version.
    #[error("Schema error in {document}: {message}")]
    Schema { document: String, message: String },

    /// An image or category reference could not be resolved.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Degenerate input with no defined base case.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Renumbered annotation ids would exceed the id range.
    #[error("Annotation id overflow: {0}")]
    IdOverflow(String),

    /// IO error on a specific file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error on a specific file.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn schema(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Schema {
            document: document.into(),
            message: message.into(),
        }
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Error::Lookup(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Error::EmptyInput(msg.into())
    }
}
