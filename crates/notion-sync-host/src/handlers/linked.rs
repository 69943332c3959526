use notion_sync_core::header;
use notion_sync_core::sync::keys;
use notion_sync_core::model::RemoteObjectRef;
use notion_sync_core::ObjectKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::state::GlobalState;

/// A vault document linked to a remote page or database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedDocument {
    pub path: PathBuf,
    /// Id and kind as recorded in the header
    pub remote: RemoteObjectRef,
    pub last_sync_time: Option<String>,
}

/// List every Markdown document whose header carries a `notion-id`.
///
/// Documents that cannot be read are skipped.
pub async fn handle_linked_documents(state: &GlobalState) -> Vec<LinkedDocument> {
    let mut linked = Vec::new();

    for path in state.store.list_files(Path::new(""), "md") {
        let content = match state.store.read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = ?path, error = %err, "Skipping unreadable document");
                continue;
            }
        };

        let header = header::read(&content);
        let notion_id = match header.get(keys::NOTION_ID) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => continue,
        };

        linked.push(LinkedDocument {
            path,
            remote: RemoteObjectRef::new(
                notion_id,
                ObjectKind::from_hint(header.get(keys::NOTION_TYPE).map(String::as_str)),
            ),
            last_sync_time: header.get(keys::LAST_SYNC_TIME).cloned(),
        });
    }

    linked
}
