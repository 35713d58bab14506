//! Error types for dvc-dataverse
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// dvc-dataverse error types
#[derive(Error, Debug)]
pub enum Error {
    /// Pipeline definition, parameter or metric file is absent (or declares no stages)
    #[error("Not found: {}\nRun `dvc repro` first or check the paths in dvc.yaml", path.display())]
    NotFound {
        /// Path that could not be opened
        path: PathBuf,
    },

    /// File exists but does not have the expected shape
    ///
    /// Covers a `dvc.yaml` that is not valid YAML or has a malformed stage;
    /// only a missing file or a missing `stages` mapping is `NotFound`.
    #[error("Malformed file {}: {reason}", path.display())]
    Format {
        /// Offending file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Document does not satisfy the data model schema
    #[error("Schema violation: {0}")]
    Schema(String),

    /// Linking template is unusable
    #[error("Linking template error: {0}")]
    Template(String),

    /// Missing or invalid runtime configuration
    #[error("Configuration error: {0}\nSet DATAVERSE_URL and DATAVERSE_API_TOKEN")]
    Config(String),

    /// Dataverse rejected the API token
    #[error("Dataverse rejected the API token (HTTP 401/403)")]
    Unauthorized,

    /// Dataverse answered with a non-success status
    #[error("Dataverse returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Network failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error outside of a specific input file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a `Format` error for `path`.
    pub fn format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Map an IO error on `path` to `NotFound` when the file is missing, `Io` otherwise.
    pub fn from_io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.as_ref().to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
