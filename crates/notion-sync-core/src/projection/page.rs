use super::property;
use crate::config::TaskLineConfig;
use crate::error::RemoteError;
use crate::header::{Document, Header};
use crate::model::Page;
use crate::remote::RemoteClient;
use crate::utils::header_key;

/// Markdown body of a page. Block traversal belongs to the remote client.
pub async fn project(client: &dyn RemoteClient, page_id: &str) -> Result<String, RemoteError> {
    client.render_page_body(page_id).await
}

/// Header of a database entry: its id, then every property in order.
pub fn entry_header(page: &Page) -> Header {
    let mut header = Header::new();
    header.insert("notion-id".to_string(), page.id.clone());
    for (name, value) in &page.properties {
        header.insert(header_key(name), property::project(value));
    }
    header
}

/// Full text of an entry file: header, body and the optional task line.
pub fn entry_document(page: &Page, body: &str, task_line: &TaskLineConfig) -> String {
    let mut text = body.to_string();
    if let Some(line) = property::task_line(page, task_line) {
        text.push_str(&line);
    }
    Document::with_header(entry_header(page), &text).render()
}
