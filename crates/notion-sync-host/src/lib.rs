//! Notion Sync Host Library
//!
//! Plugin layer, turns host commands into core sync calls.

use notion_sync_core::{DocumentStore, RemoteClient, SyncOutcome};
use std::path::Path;
use std::sync::Arc;

use crate::state::GlobalState;

pub mod config;
mod error;
mod handlers;
mod logging;
mod notice;
mod state;


pub use config::{LogLevel, PluginSettings};
pub use error::HostError;
pub use handlers::LinkedDocument;
pub use logging::init_tracing;
pub use notice::NoticeBoard;

/// Plugin entry point held by the host
pub struct NotionSyncPlugin {
    state: GlobalState,
}

impl NotionSyncPlugin {
    pub fn new(
        client: Arc<dyn RemoteClient>,
        store: Arc<dyn DocumentStore>,
        settings: PluginSettings,
    ) -> Self {
        init_tracing(settings.log_level);
        Self {
            state: GlobalState::new(client, store, settings),
        }
    }

    /// Download a page or database into `file_name`.
    pub async fn download_from_notion(
        &self,
        notion_id: &str,
        file_name: &str,
    ) -> Result<SyncOutcome, HostError> {
        handlers::handle_download_from_notion(&self.state, notion_id, file_name).await
    }

    /// Re-sync the active document from its header.
    pub async fn sync_active_document(
        &self,
        active: Option<&Path>,
    ) -> Result<SyncOutcome, HostError> {
        handlers::handle_sync_active_document(&self.state, active).await
    }

    pub async fn linked_documents(&self) -> Vec<LinkedDocument> {
        handlers::handle_linked_documents(&self.state).await
    }

    pub async fn update_settings(&self, settings_yaml: &str) -> Result<(), HostError> {
        handlers::handle_did_change_configuration(&self.state, settings_yaml).await
    }

    pub async fn settings(&self) -> PluginSettings {
        self.state.settings.read().await.clone()
    }

    /// Text of the notice currently shown, if any
    pub fn current_notice(&self) -> Option<String> {
        self.state.notices.current()
    }
}
