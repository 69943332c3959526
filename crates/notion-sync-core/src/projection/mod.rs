//! Remote content → local Markdown text.

pub mod page;
pub mod property;
pub mod rich_text;
pub mod schema;
