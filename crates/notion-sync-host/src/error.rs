use notion_sync_core::{ConfigError, SyncError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the host by plugin commands.
#[derive(Debug, Error)]
pub enum HostError {
    /// A sync of the same document is still running
    #[error("{0:?} is already being synced")]
    AlreadySyncing(PathBuf),

    #[error("no active document to sync")]
    NoActiveDocument,

    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
