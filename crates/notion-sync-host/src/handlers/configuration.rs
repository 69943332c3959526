use tracing::{error, info};

use crate::config::PluginSettings;
use crate::error::HostError;
use crate::state::GlobalState;

/// Handle a settings change from the host's settings UI.
///
/// The new settings apply to syncs started afterwards.
pub async fn handle_did_change_configuration(
    state: &GlobalState,
    settings_yaml: &str,
) -> Result<(), HostError> {
    match PluginSettings::from_yaml(settings_yaml) {
        Ok(new_settings) => {
            *state.settings.write().await = new_settings;
            info!("Plugin settings updated");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to parse updated settings");
            Err(e.into())
        }
    }
}
