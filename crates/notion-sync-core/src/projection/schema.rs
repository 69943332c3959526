use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Write;
use std::path::Path;

use crate::config::{ColumnDefaults, ViewConfigDefaults, ViewDefaults};
use crate::model::{ColumnKind, ColumnSchema, Database, SelectOption};
use crate::utils::{entries_folder, header_key, vault_path_string};

/// Opening line of the table view block
pub const VIEW_BLOCK_START: &str = "%% dbfolder:yaml";
pub const VIEW_BLOCK_END: &str = "%%";

/// Body of the document a database is projected into: a heading and a view
/// block pointing at the entries folder next to `target`.
///
/// Only the first title run is used for the heading and view name.
pub fn project(database: &Database, target: &Path, defaults: &ViewDefaults) -> String {
    let title = database
        .title
        .first()
        .map(|run| run.plain_text.as_str())
        .unwrap_or_default();
    let entries = vault_path_string(&entries_folder(target));

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_view(&mut out, title, database, &entries, defaults);
    out
}

fn write_view(
    out: &mut String,
    title: &str,
    database: &Database,
    entries: &str,
    defaults: &ViewDefaults,
) -> std::fmt::Result {
    writeln!(out, "# {}\n", title)?;
    writeln!(out, "{}", VIEW_BLOCK_START)?;
    writeln!(out, "name: {}", title)?;
    writeln!(out, "description:")?;
    writeln!(out, "columns:")?;

    for (position, (name, column)) in database.columns.iter().enumerate() {
        write_column(out, name, column, position, &defaults.column)?;
    }

    writeln!(out, "filters:")?;
    writeln!(out, "  enabled: false")?;
    writeln!(out, "  conditions:")?;
    write_config(out, entries, &defaults.config)?;
    writeln!(out, "{}", VIEW_BLOCK_END)
}

fn write_column(
    out: &mut String,
    name: &str,
    column: &ColumnSchema,
    position: usize,
    defaults: &ColumnDefaults,
) -> std::fmt::Result {
    writeln!(out, "  {}:", name)?;
    writeln!(out, "    key: {}", header_key(name))?;

    match &column.kind {
        ColumnKind::Select(options) => {
            writeln!(out, "    input: select")?;
            write_options(out, options)?;
        }
        ColumnKind::MultiSelect(options) => {
            writeln!(out, "    input: tags")?;
            write_options(out, options)?;
        }
        ColumnKind::Other(_) => writeln!(out, "    input: text")?,
    }

    writeln!(out, "    accessorKey: {}", STANDARD.encode(column.id.as_bytes()))?;
    writeln!(out, "    label: {}", name)?;
    writeln!(out, "    position: {}", position)?;
    writeln!(out, "    skipPersist: {}", defaults.skip_persist)?;
    writeln!(out, "    isHidden: {}", defaults.is_hidden)?;
    writeln!(out, "    sortIndex: {}", defaults.sort_index)?;
    writeln!(out, "    config:")?;
    writeln!(out, "      enable_media_view: {}", defaults.enable_media_view)?;
    writeln!(out, "      media_width: {}", defaults.media_width)?;
    writeln!(out, "      media_height: {}", defaults.media_height)?;
    writeln!(out, "      isInline: {}", defaults.is_inline)
}

fn write_options(out: &mut String, options: &[SelectOption]) -> std::fmt::Result {
    writeln!(out, "    options:")?;
    for option in options {
        writeln!(
            out,
            "    - {{ label: \"{}\", backgroundColor: \"{}\" }}",
            option.name, option.color
        )?;
    }
    Ok(())
}

fn write_config(out: &mut String, entries: &str, c: &ViewConfigDefaults) -> std::fmt::Result {
    writeln!(out, "config:")?;
    writeln!(out, "  remove_field_when_delete_column: {}", c.remove_field_when_delete_column)?;
    writeln!(out, "  cell_size: {}", c.cell_size)?;
    writeln!(out, "  sticky_first_column: {}", c.sticky_first_column)?;
    writeln!(out, "  group_folder_column: {}", c.group_folder_column)?;
    writeln!(out, "  remove_empty_folders: {}", c.remove_empty_folders)?;
    writeln!(out, "  automatically_group_files: {}", c.automatically_group_files)?;
    writeln!(out, "  hoist_files_with_empty_attributes: {}", c.hoist_files_with_empty_attributes)?;
    writeln!(out, "  show_metadata_created: {}", c.show_metadata_created)?;
    writeln!(out, "  show_metadata_modified: {}", c.show_metadata_modified)?;
    writeln!(out, "  show_metadata_tasks: {}", c.show_metadata_tasks)?;
    writeln!(out, "  show_metadata_inlinks: {}", c.show_metadata_inlinks)?;
    writeln!(out, "  show_metadata_outlinks: {}", c.show_metadata_outlinks)?;
    writeln!(out, "  source_data: {}", c.source_data)?;
    writeln!(out, "  source_form_result: FROM \"{}\"", entries)?;
    writeln!(out, "  source_destination_path: \"{}\"", entries)?;
    writeln!(out, "  frontmatter_quote_wrap: {}", c.frontmatter_quote_wrap)?;
    writeln!(out, "  row_templates_folder: {}", c.row_templates_folder)?;
    writeln!(out, "  current_row_template: {}", c.current_row_template)?;
    writeln!(out, "  pagination_size: {}", c.pagination_size)?;
    writeln!(out, "  enable_js_formulas: {}", c.enable_js_formulas)?;
    writeln!(out, "  formula_folder_path: {}", c.formula_folder_path)?;
    writeln!(out, "  inline_default: {}", c.inline_default)?;
    writeln!(out, "  inline_new_position: {}", c.inline_new_position)?;
    writeln!(out, "  date_format: {}", c.date_format)?;
    writeln!(out, "  datetime_format: {}", c.datetime_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RichTextRun;
    use indexmap::IndexMap;

    fn database(columns: Vec<ColumnSchema>) -> Database {
        Database {
            id: "db-1".to_string(),
            title: vec![RichTextRun::plain("Tasks"), RichTextRun::plain(" ignored")],
            last_edited_time: "2024-01-01T00:00:00.000Z".to_string(),
            cover_url: None,
            columns: columns
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect::<IndexMap<_, _>>(),
        }
    }

    fn column(id: &str, name: &str, kind: ColumnKind) -> ColumnSchema {
        ColumnSchema {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn test_select_column() {
        let db = database(vec![column(
            "abc",
            "Status",
            ColumnKind::Select(vec![SelectOption {
                name: "Done".to_string(),
                color: "green".to_string(),
            }]),
        )]);

        let body = project(&db, Path::new("Tasks.md"), &ViewDefaults::default());

        assert!(body.starts_with("# Tasks\n\n%% dbfolder:yaml\nname: Tasks\ndescription:\ncolumns:\n"));
        assert!(body.contains(
            "  Status:\n    key: Status\n    input: select\n    options:\n    - { label: \"Done\", backgroundColor: \"green\" }\n    accessorKey: YWJj\n    label: Status\n    position: 0\n"
        ));
        assert!(body.ends_with("  datetime_format: yyyy-MM-dd HH:mm:ss\n%%\n"));
    }

    #[test]
    fn test_column_inputs_and_positions() {
        let db = database(vec![
            column("title", "Name", ColumnKind::Other("title".into())),
            column("%3Ab", "Due Date", ColumnKind::Other("date".into())),
            column("t", "Tags", ColumnKind::MultiSelect(vec![])),
        ]);

        let body = project(&db, Path::new("Tasks.md"), &ViewDefaults::default());

        assert!(body.contains("  Name:\n    key: Name\n    input: text\n    accessorKey: dGl0bGU=\n"));
        assert!(body.contains("  Due Date:\n    key: Due-Date\n    input: text\n"));
        assert!(body.contains("    label: Due Date\n    position: 1\n"));
        assert!(body.contains("    input: tags\n    options:\n    accessorKey: dA==\n"));
        assert!(body.contains("    position: 2\n    skipPersist: false\n    isHidden: false\n    sortIndex: -1\n"));
    }

    #[test]
    fn test_entries_folder_at_vault_root() {
        let body = project(&database(vec![]), Path::new("Tasks.md"), &ViewDefaults::default());
        assert!(body.contains("  source_form_result: FROM \"Tasks-entries\"\n"));
        assert!(body.contains("  source_destination_path: \"Tasks-entries\"\n"));
        assert!(!body.contains("//"));
    }

    #[test]
    fn test_entries_folder_nested() {
        let body = project(
            &database(vec![]),
            Path::new("work/projects/Tasks.md"),
            &ViewDefaults::default(),
        );
        assert!(body.contains("  source_form_result: FROM \"work/projects/Tasks-entries\"\n"));
    }

    #[test]
    fn test_defaults_are_injectable() {
        let mut defaults = ViewDefaults::default();
        defaults.column.media_width = 42;
        defaults.config.pagination_size = 25;

        let db = database(vec![column("x", "Notes", ColumnKind::Other("rich_text".into()))]);
        let body = project(&db, Path::new("Tasks.md"), &defaults);

        assert!(body.contains("      media_width: 42\n"));
        assert!(body.contains("  pagination_size: 25\n"));
    }
}
