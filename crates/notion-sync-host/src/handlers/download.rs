use notion_sync_core::utils::with_markdown_extension;
use notion_sync_core::SyncOutcome;
use tracing::info;

use crate::error::HostError;
use crate::state::GlobalState;

/// Handle the "Download from Notion" command.
///
/// `file_name` is vault relative and may omit the `.md` extension. The file
/// is created if needed and overwritten otherwise.
pub async fn handle_download_from_notion(
    state: &GlobalState,
    notion_id: &str,
    file_name: &str,
) -> Result<SyncOutcome, HostError> {
    let notion_id = notion_id.trim();
    let file_name = file_name.trim();
    if notion_id.is_empty() {
        return Err(HostError::MissingInput("notion id"));
    }
    if file_name.is_empty() {
        return Err(HostError::MissingInput("file name"));
    }

    let path = with_markdown_extension(file_name);
    info!(notion_id = %notion_id, path = ?path, "Download from notion requested");

    let guard = state.begin_sync(&path)?;
    let synchronizer = state.synchronizer().await;
    let result = synchronizer.download_to_file(notion_id, &path).await;
    guard.finish();

    Ok(result?)
}
