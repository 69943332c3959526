use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{wire, QueryPage, RemoteClient};
use crate::error::RemoteError;
use crate::model::{Database, Page};
use crate::vfs::{DocumentStore, PhysicalStore};

/// Replays recorded API responses from a directory.
///
/// Layout:
///
/// ```text
/// pages/<id>.json          page object
/// databases/<id>.json      database object
/// queries/<id>/<n>.json    n-th page of the database query (0-based)
/// bodies/<id>.md           rendered page body
/// ```
///
/// Query cursors are page numbers: a recorded list response with
/// `has_more: true` continues at the next file.
pub struct SnapshotClient {
    store: PhysicalStore,
}

impl SnapshotClient {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: PhysicalStore::new(dir),
        }
    }

    fn read(&self, path: &Path, id: &str) -> Result<String, RemoteError> {
        if !self.store.exists(path) {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(self.store.read_to_string(path)?)
    }
}

#[async_trait]
impl RemoteClient for SnapshotClient {
    async fn retrieve_page(&self, id: &str) -> Result<Page, RemoteError> {
        let json = self.read(&Path::new("pages").join(format!("{id}.json")), id)?;
        wire::parse_page(&json)
    }

    async fn retrieve_database(&self, id: &str) -> Result<Database, RemoteError> {
        let json = self.read(&Path::new("databases").join(format!("{id}.json")), id)?;
        wire::parse_database(&json)
    }

    async fn query_database(
        &self,
        database_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, RemoteError> {
        let index: usize = match cursor {
            Some(cursor) => cursor
                .parse()
                .map_err(|_| RemoteError::Malformed(format!("invalid cursor {:?}", cursor)))?,
            None => 0,
        };

        let path = Path::new("queries")
            .join(database_id)
            .join(format!("{index}.json"));
        if index == 0 && !self.store.exists(&path) {
            return Ok(QueryPage::default());
        }

        let mut page = wire::parse_query(&self.read(&path, database_id)?)?;
        if page.next_cursor.is_some() {
            page.next_cursor = Some((index + 1).to_string());
        }
        Ok(page)
    }

    async fn render_page_body(&self, page_id: &str) -> Result<String, RemoteError> {
        self.read(&Path::new("bodies").join(format!("{page_id}.md")), page_id)
    }
}
