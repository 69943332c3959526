use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Abstract interface for the local note vault.
///
/// All paths are relative to the vault root.
pub trait DocumentStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Read the entire contents of a document into a string.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Create a folder (and any missing parents).
    fn create_folder(&self, path: &Path) -> std::io::Result<()>;

    /// Create a new document. Fails if it already exists.
    fn create_file(&self, path: &Path, content: &str) -> std::io::Result<()>;

    /// Replace the whole content of an existing document.
    fn overwrite(&self, path: &Path, content: &str) -> std::io::Result<()>;

    /// List all documents with the given extension under `root`.
    /// This should be a recursive search.
    fn list_files(&self, root: &Path, extension: &str) -> Vec<PathBuf>;

    /// Create the document if absent, otherwise overwrite it.
    fn create_or_overwrite(&self, path: &Path, content: &str) -> std::io::Result<()> {
        if self.exists(path) {
            self.overwrite(path, content)
        } else {
            self.create_file(path, content)
        }
    }
}

/// Vault backed by a directory on disk, using std::fs and walkdir.
pub struct PhysicalStore {
    root: PathBuf,
}

impl PhysicalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl DocumentStore for PhysicalStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn create_folder(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(self.resolve(path))
    }

    fn create_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(full_path)?;
        std::io::Write::write_all(&mut file, content.as_bytes())
    }

    fn overwrite(&self, path: &Path, content: &str) -> std::io::Result<()> {
        std::fs::write(self.resolve(path), content)
    }

    fn list_files(&self, root: &Path, extension: &str) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(self.resolve(root))
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == extension {
                        if let Ok(relative) = path.strip_prefix(&self.root) {
                            files.push(relative.to_path_buf());
                        }
                    }
                }
            }
        }

        files.sort();
        files
    }
}
