use notion_sync_core::SyncOutcome;
use std::path::Path;
use tracing::{info, warn};

use crate::error::HostError;
use crate::state::GlobalState;

/// Handle the "Sync current file" command for the active document.
pub async fn handle_sync_active_document(
    state: &GlobalState,
    active: Option<&Path>,
) -> Result<SyncOutcome, HostError> {
    let path = active.ok_or(HostError::NoActiveDocument)?;

    let guard = state.begin_sync(path).map_err(|err| {
        warn!(path = ?path, "Sync already running for this document");
        err
    })?;
    let synchronizer = state.synchronizer().await;
    let result = synchronizer.sync_document(path).await;
    guard.finish();

    let outcome = result?;
    if let SyncOutcome::NotLinked { .. } = outcome {
        info!(path = ?path, "Active document has no notion-id");
    }
    Ok(outcome)
}
