use notion_sync_core::{DocumentStore, Notifier, RemoteClient, Synchronizer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::PluginSettings;
use crate::error::HostError;
use crate::notice::NoticeBoard;

/// Global state shared by every command.
/// Must be Send + Sync
#[derive(Clone)]
pub struct GlobalState {
    /// Settings, replaced whole when the user edits them
    pub settings: Arc<RwLock<PluginSettings>>,

    pub client: Arc<dyn RemoteClient>,

    pub store: Arc<dyn DocumentStore>,

    pub notices: Arc<NoticeBoard>,

    /// Vault paths of documents with a sync in progress
    /// Never held across an await.
    pub in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl GlobalState {
    pub fn new(
        client: Arc<dyn RemoteClient>,
        store: Arc<dyn DocumentStore>,
        settings: PluginSettings,
    ) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            client,
            store,
            notices: Arc::new(NoticeBoard::new()),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// A synchronizer bound to the current settings.
    pub async fn synchronizer(&self) -> Synchronizer {
        let config = self.settings.read().await.sync.clone();
        Synchronizer::new(
            self.client.clone(),
            self.store.clone(),
            self.notices.clone(),
            config,
        )
    }

    /// Mark `path` as syncing until the returned guard is dropped. Fails if
    /// it already is.
    pub fn begin_sync(&self, path: &Path) -> Result<SyncGuard, HostError> {
        if !lock(&self.in_flight).insert(path.to_path_buf()) {
            return Err(HostError::AlreadySyncing(path.to_path_buf()));
        }
        Ok(SyncGuard {
            path: path.to_path_buf(),
            in_flight: self.in_flight.clone(),
            notices: self.notices.clone(),
            finished: false,
        })
    }

    pub fn is_syncing(&self, path: &Path) -> bool {
        lock(&self.in_flight).contains(path)
    }
}

fn lock(in_flight: &Mutex<HashSet<PathBuf>>) -> MutexGuard<'_, HashSet<PathBuf>> {
    in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Marks one document as syncing.
///
/// Dropping the guard releases the document, also when the command future is
/// dropped mid-sync. A sync that never called [`SyncGuard::finish`] takes its
/// notice down with it.
#[must_use]
pub struct SyncGuard {
    path: PathBuf,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
    notices: Arc<NoticeBoard>,
    finished: bool,
}

impl SyncGuard {
    /// The sync ran to completion, successfully or not.
    pub fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.path);
        if !self.finished {
            debug!(path = ?self.path, "Sync abandoned");
            self.notices.dismiss();
        }
    }
}
