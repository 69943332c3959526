//! Error types for the sync engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a remote client.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No page or database exists with this id (or access was denied)
    #[error("remote object not found: {0}")]
    NotFound(String),

    /// The payload did not have the expected shape
    #[error("malformed remote payload: {0}")]
    Malformed(String),

    /// Transport level failure reported by the underlying client
    #[error("remote transport failed: {0}")]
    Transport(String),

    #[error("failed to decode payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors of a sync operation.
///
/// Resolution failures and individual entry failures are not errors:
/// they are logged and reported through the sync outcome.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("document store failed at {path:?}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl SyncError {
    pub(crate) fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Store {
            path: path.into(),
            source,
        }
    }
}
