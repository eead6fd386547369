//! Error types for the remote apps core.
//!
//! Per-file and per-icon failures are contained where they happen (logged,
//! then the file or icon is skipped). Only spawn failures are expected to
//! reach the HTTP layer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the remote apps core.
#[derive(Debug, Error)]
pub enum RemoteAppsError {
    // Descriptor errors
    #[error("file has no fields or is invalid: {path}")]
    InvalidShortcut { path: PathBuf },

    // Icon errors
    #[error("icon not found: {reference}")]
    IconNotFound { reference: String },

    #[error("failed to decode icon {path}: {message}")]
    IconDecode { path: PathBuf, message: String },

    // Launch errors
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Registry errors
    #[error("app not found: {name}")]
    ShortcutNotFound { name: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("watch error: {message}")]
    Watch { message: String },

    // Platform errors
    #[error("preload library lookup failed: {message}")]
    Preload { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for remote apps operations.
pub type Result<T> = std::result::Result<T, RemoteAppsError>;

impl From<std::io::Error> for RemoteAppsError {
    fn from(err: std::io::Error) -> Self {
        RemoteAppsError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<notify::Error> for RemoteAppsError {
    fn from(err: notify::Error) -> Self {
        RemoteAppsError::Watch {
            message: err.to_string(),
        }
    }
}

impl RemoteAppsError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        RemoteAppsError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// HTTP status code the façade reports for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            RemoteAppsError::ShortcutNotFound { .. } => 404,
            RemoteAppsError::InvalidShortcut { .. } => 400,
            _ => 500,
        }
    }

    /// Whether the error belongs to a single descriptor file or icon and must
    /// be logged and skipped rather than propagated.
    pub fn is_contained(&self) -> bool {
        matches!(
            self,
            RemoteAppsError::InvalidShortcut { .. }
                | RemoteAppsError::IconNotFound { .. }
                | RemoteAppsError::IconDecode { .. }
        )
    }
}
