//! Sync orchestration: resolve a remote id, project it, write files and
//! stamp the sync header.

mod notify;


pub use notify::{LogNotifier, Notifier};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::header::{self, HeaderEditor};
use crate::model::{Database, NotionId, ObjectKind, RemoteObject};
use crate::projection::{page, schema};
use crate::remote::{DatabaseQuery, RemoteClient};
use crate::utils::{entries_folder, entry_file_name, time};
use crate::vfs::DocumentStore;

/// Header keys carrying the sync state of a document
pub mod keys {
    pub const NOTION_ID: &str = "notion-id";
    pub const NOTION_TYPE: &str = "notion-type";
    pub const LAST_SYNC_TIME: &str = "notion-last-sync-time";
    pub const DATABASE_PLUGIN: &str = "database-plugin";
    pub const BANNER: &str = "banner";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    ResolvingType,
    ProjectingPage,
    ProjectingDatabase,
    WritingFile,
    UpdatingMetadata,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub notion_id: NotionId,
    pub kind: ObjectKind,
    pub path: PathBuf,
    pub entries_written: usize,
    /// Entries whose body could not be rendered, plus failed query pages
    pub entries_failed: usize,
    /// Query results that were not full pages
    pub entries_skipped: usize,
    pub synced_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced(SyncReport),
    /// Neither a page nor a database answered to the id; nothing was written
    Unresolved { notion_id: NotionId },
    /// The document carries no `notion-id`
    NotLinked { path: PathBuf },
}

impl SyncOutcome {
    pub fn state(&self) -> SyncState {
        match self {
            SyncOutcome::Synced(_) => SyncState::Done,
            SyncOutcome::Unresolved { .. } => SyncState::Failed,
            SyncOutcome::NotLinked { .. } => SyncState::Idle,
        }
    }
}

/// Tracks the state of one sync for tracing.
struct SyncRun<'a> {
    notion_id: &'a str,
    state: SyncState,
}

impl<'a> SyncRun<'a> {
    fn new(notion_id: &'a str) -> Self {
        Self {
            notion_id,
            state: SyncState::Idle,
        }
    }

    fn enter(&mut self, next: SyncState) {
        debug!(notion_id = %self.notion_id, from = ?self.state, to = ?next, "Sync state");
        self.state = next;
    }

    fn fail(&mut self, err: SyncError) -> SyncError {
        self.enter(SyncState::Failed);
        error!(notion_id = %self.notion_id, error = %err, "Sync failed");
        err
    }
}

/// Downloads remote pages and databases into vault documents.
///
/// One sync runs as a sequence of awaited steps; nothing is spawned and a
/// started sync runs to completion or failure.
pub struct Synchronizer {
    client: Arc<dyn RemoteClient>,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(
        client: Arc<dyn RemoteClient>,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        config: SyncConfig,
    ) -> Self {
        Self {
            client,
            store,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn DocumentStore {
        &*self.store
    }

    /// Download `notion_id` into `path`, creating the document if needed.
    pub async fn download_to_file(
        &self,
        notion_id: &str,
        path: &Path,
    ) -> Result<SyncOutcome, SyncError> {
        if !self.store.exists(path) {
            self.store
                .create_file(path, "")
                .map_err(|e| SyncError::store(path, e))?;
        }
        self.sync_to_file(notion_id, path, ObjectKind::Unknown).await
    }

    /// Re-sync a document from the id and kind stored in its header.
    pub async fn sync_document(&self, path: &Path) -> Result<SyncOutcome, SyncError> {
        let content = self
            .store
            .read_to_string(path)
            .map_err(|e| SyncError::store(path, e))?;
        let header = header::read(&content);

        let notion_id = match header.get(keys::NOTION_ID).map(|id| id.trim()) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                debug!(path = ?path, "Document is not linked to notion");
                return Ok(SyncOutcome::NotLinked {
                    path: path.to_path_buf(),
                });
            }
        };
        let hint = ObjectKind::from_hint(header.get(keys::NOTION_TYPE).map(String::as_str));

        self.sync_to_file(&notion_id, path, hint).await
    }

    /// Resolve `notion_id`, overwrite `path` with its projection and update
    /// the sync header.
    pub async fn sync_to_file(
        &self,
        notion_id: &str,
        path: &Path,
        hint: ObjectKind,
    ) -> Result<SyncOutcome, SyncError> {
        let mut run = SyncRun::new(notion_id);
        self.notifier.show(&self.config.notices.started);

        run.enter(SyncState::ResolvingType);
        let object = match self.client.resolve(notion_id, hint).await {
            Ok(object) => object,
            Err(err) => {
                run.enter(SyncState::Failed);
                warn!(notion_id = %notion_id, path = ?path, error = %err, "Could not sync with notion");
                self.notifier.dismiss();
                return Ok(SyncOutcome::Unresolved {
                    notion_id: notion_id.to_string(),
                });
            }
        };

        match self.project_and_write(&mut run, notion_id, path, &object).await {
            Ok(report) => {
                run.enter(SyncState::Done);
                info!(
                    notion_id = %notion_id,
                    kind = object.kind().as_str(),
                    path = ?path,
                    entries = report.entries_written,
                    "Notion sync finished"
                );
                self.notifier.show(&self.config.notices.finished);
                Ok(SyncOutcome::Synced(report))
            }
            Err(err) => {
                self.notifier.dismiss();
                Err(run.fail(err))
            }
        }
    }

    async fn project_and_write(
        &self,
        run: &mut SyncRun<'_>,
        notion_id: &str,
        path: &Path,
        object: &RemoteObject,
    ) -> Result<SyncReport, SyncError> {
        let synced_at = time::now();
        let mut report = SyncReport {
            notion_id: notion_id.to_string(),
            kind: object.kind(),
            path: path.to_path_buf(),
            entries_written: 0,
            entries_failed: 0,
            entries_skipped: 0,
            synced_at: synced_at.clone(),
        };

        // Taken before the body is replaced so hand-written keys survive.
        let mut editor =
            HeaderEditor::load(&*self.store, path).map_err(|e| SyncError::store(path, e))?;

        let body = match object {
            RemoteObject::Page(_) => {
                run.enter(SyncState::ProjectingPage);
                page::project(&*self.client, notion_id).await?
            }
            RemoteObject::Database(database) => {
                run.enter(SyncState::ProjectingDatabase);
                schema::project(database, path, &self.config.view)
            }
        };

        run.enter(SyncState::WritingFile);
        self.store
            .create_or_overwrite(path, &body)
            .map_err(|e| SyncError::store(path, e))?;

        if let RemoteObject::Database(database) = object {
            self.sync_entries(database, path, &mut report).await?;
        }

        run.enter(SyncState::UpdatingMetadata);
        editor
            .set(keys::NOTION_ID, notion_id)
            .set(keys::NOTION_TYPE, object.kind().as_str())
            .set(keys::LAST_SYNC_TIME, synced_at);
        if object.kind() == ObjectKind::Database {
            editor.set(
                keys::DATABASE_PLUGIN,
                self.config.metadata.database_plugin_marker.as_str(),
            );
        }
        if let Some(url) = object.cover_url() {
            editor.set(keys::BANNER, format!("\"{}\"", url));
        }
        editor
            .apply_to_body(&*self.store, &body)
            .map_err(|e| SyncError::store(path, e))?;

        Ok(report)
    }

    /// Write one file per database entry into the entries folder.
    ///
    /// Entry level failures are logged and counted; only store failures abort.
    async fn sync_entries(
        &self,
        database: &Database,
        path: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let folder = entries_folder(path);
        if !self.store.exists(&folder) {
            self.store
                .create_folder(&folder)
                .map_err(|e| SyncError::store(&folder, e))?;
        }

        let mut query = DatabaseQuery::new(&*self.client, database.id.as_str());
        loop {
            let batch = match query.next_batch().await {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(err) => {
                    warn!(database_id = %database.id, error = %err, "Database query failed, remaining entries not synced");
                    report.entries_failed += 1;
                    break;
                }
            };

            for entry in batch {
                let Some(file_name) = entry_file_name(&entry.id) else {
                    warn!(entry_id = %entry.id, "Entry id is not a valid file name, skipping");
                    report.entries_failed += 1;
                    continue;
                };
                let body = match page::project(&*self.client, &entry.id).await {
                    Ok(body) => body,
                    Err(err) => {
                        warn!(entry_id = %entry.id, error = %err, "Skipping database entry");
                        report.entries_failed += 1;
                        continue;
                    }
                };

                let entry_path = folder.join(file_name);
                let content = page::entry_document(&entry, &body, &self.config.task_line);
                self.store
                    .create_or_overwrite(&entry_path, &content)
                    .map_err(|e| SyncError::store(&entry_path, e))?;
                report.entries_written += 1;
            }
        }

        report.entries_skipped = query.skipped();
        if report.entries_skipped > 0 {
            debug!(database_id = %database.id, skipped = report.entries_skipped, "Query results skipped");
        }
        if query.malformed() > 0 {
            warn!(database_id = %database.id, malformed = query.malformed(), "Malformed database entries not synced");
            report.entries_failed += query.malformed();
        }
        Ok(())
    }
}
