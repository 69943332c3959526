//! Notion Sync Core Library
//!
//! Downloads Notion pages and databases into a Markdown vault: header codec,
//! property and schema projection, remote client seam and the sync
//! orchestrator. Vault IO goes through [`vfs::DocumentStore`].
//!

pub mod config;
pub mod error;
pub mod header;
pub mod model;
pub mod projection;
pub mod remote;
pub mod sync;
pub mod utils;
pub mod vfs;

pub use config::SyncConfig;
pub use error::{ConfigError, RemoteError, SyncError};
pub use header::{Document, Header, HeaderEditor};
pub use model::{NotionId, ObjectKind, RemoteObject};
pub use remote::{DatabaseQuery, RemoteClient, SnapshotClient};
pub use sync::{LogNotifier, Notifier, SyncOutcome, SyncReport, SyncState, Synchronizer};
pub use utils::{entries_folder, vault_path_string};
pub use vfs::{DocumentStore, PhysicalStore};
