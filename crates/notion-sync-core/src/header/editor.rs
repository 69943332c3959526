use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{merge, read, Document, Header};
use crate::vfs::DocumentStore;

/// Pending header changes for one document.
///
/// The editor keeps a snapshot of the header as it was when the editor was
/// created. Pending values are merged over that snapshot when applied, so keys
/// the user added by hand survive a body rewrite that drops the header.
#[derive(Debug, Clone)]
pub struct HeaderEditor {
    path: PathBuf,
    snapshot: Header,
    pending: Header,
    removals: BTreeSet<String>,
}

impl HeaderEditor {
    pub fn new(path: impl Into<PathBuf>, snapshot: Header) -> Self {
        Self {
            path: path.into(),
            snapshot,
            pending: Header::new(),
            removals: BTreeSet::new(),
        }
    }

    /// Snapshot the header of `path`. A missing document has an empty header.
    pub fn load(store: &dyn DocumentStore, path: &Path) -> std::io::Result<Self> {
        let snapshot = if store.exists(path) {
            read(&store.read_to_string(path)?)
        } else {
            Header::new()
        };
        Ok(Self::new(path, snapshot))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.removals.remove(key);
        self.pending.insert(key.to_string(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.pending.shift_remove(key);
        self.removals.insert(key.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if self.removals.contains(key) {
            return None;
        }
        self.pending
            .get(key)
            .or_else(|| self.snapshot.get(key))
            .map(String::as_str)
    }

    /// Snapshot overwritten by pending changes, minus removals.
    pub fn merged(&self) -> Header {
        merge(
            &self.snapshot,
            &self.pending,
            self.removals.iter().map(String::as_str),
        )
    }

    /// Write the merged header into the document as it currently is on disk.
    pub fn apply(&self, store: &dyn DocumentStore) -> std::io::Result<()> {
        let content = store.read_to_string(&self.path)?;
        let mut document = Document::parse(&content);
        document.replace_header(self.merged());

        let rendered = document.render();
        if rendered != content {
            store.overwrite(&self.path, &rendered)?;
        }
        Ok(())
    }

    /// Write the merged header in front of a body this caller just produced.
    ///
    /// The body is never parsed, so a body that happens to open with a
    /// `---` line is not mistaken for a header.
    pub fn apply_to_body(&self, store: &dyn DocumentStore, body: &str) -> std::io::Result<()> {
        let mut document = Document::without_header(body);
        document.replace_header(self.merged());
        store.overwrite(&self.path, &document.render())
    }
}

/// Read the header of `path`, merge `changes` and `removals` over it and write
/// it back, leaving the body untouched.
pub fn merge_and_write<'a>(
    store: &dyn DocumentStore,
    path: &Path,
    changes: &Header,
    removals: impl IntoIterator<Item = &'a str>,
) -> std::io::Result<()> {
    let content = store.read_to_string(path)?;
    let mut document = Document::parse(&content);
    let existing = read(&content);
    document.replace_header(merge(&existing, changes, removals));

    let rendered = document.render();
    if rendered != content {
        store.overwrite(path, &rendered)?;
    }
    Ok(())
}
