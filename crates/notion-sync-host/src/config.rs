use notion_sync_core::{ConfigError, SyncConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    /// Logging level for the plugin
    pub log_level: LogLevel,

    /// Projection and notice settings handed to every sync
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            sync: SyncConfig::default(),
        }
    }
}

impl PluginSettings {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load settings from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let yaml = r#"
logLevel: debug
sync:
  notices:
    finished: "Done"
"#;
        let settings = PluginSettings::from_yaml(yaml).unwrap();

        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.sync.notices.finished, "Done");
        assert_eq!(
            settings.sync.notices.started,
            "Starting notion download... this can take a while..."
        );
        assert_eq!(settings.sync.metadata.database_plugin_marker, "basic");
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut settings = PluginSettings::default();
        settings.log_level = LogLevel::Warning;
        settings.sync.task_line.enabled = false;

        let yaml = settings.to_yaml().unwrap();
        assert!(yaml.contains("logLevel: warning"));
        assert_eq!(PluginSettings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let settings = PluginSettings::load(&temp_dir.path().join("settings.yaml")).unwrap();
        assert_eq!(settings, PluginSettings::default());
    }
}
