//! Shared error types for the benchmark harness

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for clusterbench operations
#[derive(Debug, Error)]
pub enum Error {
    /// An illegal child variant was assigned to a structural node
    #[error("invalid child: {child} node is not a legal child of a {parent} node")]
    InvalidVariant { parent: String, child: String },

    /// Averaging was requested over an empty result sequence
    #[error("cannot average an empty result sequence")]
    EmptyReduction,

    /// The parsed-data folder for a repository is absent or empty
    #[error("no parsed data for {repository} at {}", path.display())]
    MissingData { repository: String, path: PathBuf },

    /// An edge endpoint is not a member of the graph's cluster set
    #[error("edge endpoint {node} is not a member of the cluster set")]
    DanglingEdge { node: String },

    /// Experiment settings could not be loaded or parsed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Opaque failure surfaced unchanged from a pluggable algorithm
    #[error(transparent)]
    Algorithm(#[from] anyhow::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid-variant error from parent and child kind names
    pub fn invalid_variant(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::InvalidVariant {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Create a missing-data error for a repository's parsed-data folder
    pub fn missing_data(repository: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingData {
            repository: repository.into(),
            path: path.into(),
        }
    }

    /// Create a dangling-edge error naming the offending node
    pub fn dangling_edge(node: impl Into<String>) -> Self {
        Self::DanglingEdge { node: node.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
