use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for a sync
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub view: ViewDefaults,
    pub task_line: TaskLineConfig,
    pub notices: NoticeConfig,
    pub metadata: MetadataConfig,
}

/// Display defaults written into every database view block.
///
/// The rendering plugin reads these; they are passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub column: ColumnDefaults,
    pub config: ViewConfigDefaults,
}

/// Per-column display settings, identical for every column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefaults {
    pub skip_persist: bool,
    pub is_hidden: bool,
    /// -1 leaves the column unsorted
    pub sort_index: i32,
    pub enable_media_view: bool,
    pub media_width: u32,
    pub media_height: u32,
    pub is_inline: bool,
}

impl Default for ColumnDefaults {
    fn default() -> Self {
        Self {
            skip_persist: false,
            is_hidden: false,
            sort_index: -1,
            enable_media_view: true,
            media_width: 80,
            media_height: 100,
            is_inline: false,
        }
    }
}

/// View-level settings of the `config:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfigDefaults {
    pub remove_field_when_delete_column: bool,
    pub cell_size: String,
    pub sticky_first_column: bool,
    pub group_folder_column: String,
    pub remove_empty_folders: bool,
    pub automatically_group_files: bool,
    pub hoist_files_with_empty_attributes: bool,
    pub show_metadata_created: bool,
    pub show_metadata_modified: bool,
    pub show_metadata_tasks: bool,
    pub show_metadata_inlinks: bool,
    pub show_metadata_outlinks: bool,
    pub source_data: String,
    pub frontmatter_quote_wrap: bool,
    pub row_templates_folder: String,
    pub current_row_template: String,
    pub pagination_size: u32,
    pub enable_js_formulas: bool,
    pub formula_folder_path: String,
    pub inline_default: bool,
    pub inline_new_position: String,
    pub date_format: String,
    pub datetime_format: String,
}

impl Default for ViewConfigDefaults {
    fn default() -> Self {
        Self {
            remove_field_when_delete_column: false,
            cell_size: "normal".to_string(),
            sticky_first_column: false,
            group_folder_column: String::new(),
            remove_empty_folders: false,
            automatically_group_files: false,
            hoist_files_with_empty_attributes: true,
            show_metadata_created: true,
            show_metadata_modified: true,
            show_metadata_tasks: true,
            show_metadata_inlinks: true,
            show_metadata_outlinks: true,
            source_data: "query".to_string(),
            frontmatter_quote_wrap: false,
            row_templates_folder: "/".to_string(),
            current_row_template: String::new(),
            pagination_size: 10,
            enable_js_formulas: true,
            formula_folder_path: "/".to_string(),
            inline_default: false,
            inline_new_position: "top".to_string(),
            date_format: "yyyy-MM-dd".to_string(),
            datetime_format: "yyyy-MM-dd HH:mm:ss".to_string(),
        }
    }
}

/// Task list line appended to entries of to-do style databases.
/// Properties are matched by exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskLineConfig {
    pub enabled: bool,
    pub complete_property: String,
    pub priority_property: String,
    pub due_date_property: String,
}

impl Default for TaskLineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            complete_property: "Complete".to_string(),
            priority_property: "Priority".to_string(),
            due_date_property: "Due Date".to_string(),
        }
    }
}

/// Messages shown to the user around a sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub started: String,
    pub finished: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            started: "Starting notion download... this can take a while...".to_string(),
            finished: "Notion Download finished!".to_string(),
        }
    }
}

/// Values written into the sync header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Marker telling the table plugin a document is a database view
    pub database_plugin_marker: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            database_plugin_marker: "basic".to_string(),
        }
    }
}

impl SyncConfig {
    /// Load config from YAML content
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SyncConfig::from_yaml(
            "task_line:\n  due_date_property: Deadline\nview:\n  column:\n    media_width: 120\n",
        )
        .unwrap();

        assert_eq!(config.task_line.due_date_property, "Deadline");
        assert_eq!(config.task_line.complete_property, "Complete");
        assert_eq!(config.view.column.media_width, 120);
        assert_eq!(config.view.column.media_height, 100);
        assert_eq!(config.metadata.database_plugin_marker, "basic");
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SyncConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SyncConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SyncConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
