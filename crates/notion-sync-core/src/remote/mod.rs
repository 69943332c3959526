//! Remote document service interaction.
//!
//! Business logic depends on [`RemoteClient`], never on transport details.
//! Payloads are validated into the closed types of [`crate::model`] at this
//! boundary (see [`wire`]).

pub mod snapshot;
pub mod wire;

use async_trait::async_trait;
use tracing::debug;

use crate::error::RemoteError;
use crate::model::{Database, ObjectKind, Page, RemoteObject};

pub use snapshot::SnapshotClient;

/// One page of database query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub results: Vec<Page>,
    /// Cursor of the following page; `None` once the query is drained
    pub next_cursor: Option<String>,
    /// Results that were not full pages and could not be projected
    pub skipped: usize,
    /// Full pages whose properties did not validate
    pub malformed: usize,
}

/// The ability to retrieve content from the remote workspace.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn retrieve_page(&self, id: &str) -> Result<Page, RemoteError>;

    async fn retrieve_database(&self, id: &str) -> Result<Database, RemoteError>;

    /// One page of the database's entries, starting at `cursor`.
    async fn query_database(
        &self,
        database_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, RemoteError>;

    /// Flatten the page's block tree into Markdown.
    async fn render_page_body(&self, page_id: &str) -> Result<String, RemoteError>;

    /// Resolve an id of unknown kind.
    ///
    /// Without a hint, or with a `page` hint, the page endpoint is tried
    /// first. The database endpoint is tried unless the hint says `page`.
    /// Every retrieval failure collapses into `NotFound`.
    async fn resolve(&self, id: &str, hint: ObjectKind) -> Result<RemoteObject, RemoteError> {
        if hint != ObjectKind::Database {
            match self.retrieve_page(id).await {
                Ok(page) => return Ok(RemoteObject::Page(page)),
                Err(err) => {
                    debug!(notion_id = %id, error = %err, "Page retrieval failed");
                    if hint == ObjectKind::Page {
                        return Err(RemoteError::NotFound(id.to_string()));
                    }
                }
            }
        }

        match self.retrieve_database(id).await {
            Ok(database) => Ok(RemoteObject::Database(database)),
            Err(err) => {
                debug!(notion_id = %id, error = %err, "Database retrieval failed");
                Err(RemoteError::NotFound(id.to_string()))
            }
        }
    }
}

/// Lazy, sequential walk over every page of a database query.
///
/// Pages are fetched one at a time, each after the previous one was handed
/// out. Once drained (or after an error) the query cannot be restarted.
pub struct DatabaseQuery<'a> {
    client: &'a dyn RemoteClient,
    database_id: String,
    cursor: Option<String>,
    finished: bool,
    skipped: usize,
    malformed: usize,
}

impl<'a> DatabaseQuery<'a> {
    pub fn new(client: &'a dyn RemoteClient, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            cursor: None,
            finished: false,
            skipped: 0,
            malformed: 0,
        }
    }

    /// Next batch of entries, `None` once the query is drained.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Page>>, RemoteError> {
        if self.finished {
            return Ok(None);
        }

        let page = match self
            .client
            .query_database(&self.database_id, self.cursor.as_deref())
            .await
        {
            Ok(page) => page,
            Err(err) => {
                self.finished = true;
                return Err(err);
            }
        };

        self.skipped += page.skipped;
        self.malformed += page.malformed;
        self.finished = page.next_cursor.is_none();
        self.cursor = page.next_cursor;
        Ok(Some(page.results))
    }

    /// Results dropped by the remote boundary so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Entries dropped because their payload did not validate
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}
