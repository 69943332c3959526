pub mod time;

use std::path::{Path, PathBuf};

/// Render a vault-relative path with forward slashes.
///
/// Converts backslashes to forward slashes (Windows compatibility) and drops
/// any leading separator, so a document at the vault root has no prefix.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use notion_sync_core::vault_path_string;
///
/// assert_eq!(vault_path_string(Path::new("foo/bar.md")), "foo/bar.md");
/// assert_eq!(vault_path_string(Path::new("/note.md")), "note.md");
/// ```
pub fn vault_path_string(path: &Path) -> String {
    let mut s = path.to_string_lossy().to_string();
    if std::path::MAIN_SEPARATOR == '\\' {
        s = s.replace('\\', "/");
    }
    s.trim_start_matches('/').to_string()
}

/// Folder holding one file per entry of the database projected into `document`.
///
/// `<dir>/<stem>.md` maps to `<dir>/<stem>-entries`; a document at the vault
/// root maps to `<stem>-entries`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use notion_sync_core::entries_folder;
///
/// assert_eq!(entries_folder(Path::new("Tasks.md")), PathBuf::from("Tasks-entries"));
/// assert_eq!(
///     entries_folder(Path::new("work/Tasks.md")),
///     PathBuf::from("work/Tasks-entries")
/// );
/// ```
pub fn entries_folder(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let folder = format!("{}-entries", stem);

    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(folder),
        _ => PathBuf::from(folder),
    }
}

/// File name of a database entry inside its entries folder.
///
/// Ids that could name anything outside the folder (path separators, `..`,
/// empty) have no file name.
///
/// # Examples
///
/// ```
/// use notion_sync_core::utils::entry_file_name;
///
/// assert_eq!(entry_file_name("e1").as_deref(), Some("e1.md"));
/// assert_eq!(entry_file_name("../escape"), None);
/// ```
pub fn entry_file_name(id: &str) -> Option<String> {
    let unsafe_id = id.is_empty()
        || id == "."
        || id.contains("..")
        || id.contains(['/', '\\', '\0', ':']);
    if unsafe_id {
        return None;
    }
    Some(format!("{}.md", id))
}

/// Header key for a remote property name: spaces become hyphens.
pub fn header_key(name: &str) -> String {
    name.replace(' ', "-")
}

/// Append the Markdown extension unless the name already has it.
pub fn with_markdown_extension(file_name: &str) -> PathBuf {
    if file_name.ends_with(".md") {
        PathBuf::from(file_name)
    } else {
        PathBuf::from(format!("{}.md", file_name))
    }
}
