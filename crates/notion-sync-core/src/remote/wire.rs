//! Notion API payloads → domain types.
//!
//! Responses are deserialized into loose transfer objects and then validated
//! into the closed [`PropertyValue`] union. Unknown property kinds become
//! [`PropertyValue::Unsupported`]; a known kind with the wrong shape is an error.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::QueryPage;
use crate::error::RemoteError;
use crate::model::{
    ColumnKind, ColumnSchema, Database, DateRange, Page, PropertyValue, RichTextRun,
    SelectOption, User,
};

#[derive(Debug, Deserialize)]
struct PageDto {
    object: String,
    id: String,
    #[serde(default)]
    last_edited_time: String,
    #[serde(default)]
    cover: Option<FileDto>,
    /// Absent on partial page objects
    properties: Option<IndexMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct DatabaseDto {
    object: String,
    id: String,
    #[serde(default)]
    title: Vec<RichTextRun>,
    #[serde(default)]
    last_edited_time: String,
    #[serde(default)]
    cover: Option<FileDto>,
    #[serde(default)]
    properties: IndexMap<String, ColumnDto>,
}

#[derive(Debug, Deserialize)]
struct ColumnDto {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    select: Option<OptionsDto>,
    #[serde(default)]
    multi_select: Option<OptionsDto>,
}

#[derive(Debug, Default, Deserialize)]
struct OptionsDto {
    #[serde(default)]
    options: Vec<SelectOption>,
}

/// `external` and uploaded `file` covers both carry a URL
#[derive(Debug, Deserialize)]
struct FileDto {
    #[serde(default)]
    external: Option<UrlDto>,
    #[serde(default)]
    file: Option<UrlDto>,
}

#[derive(Debug, Deserialize)]
struct UrlDto {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListDto {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

impl FileDto {
    fn into_url(self) -> Option<String> {
        self.external.or(self.file).map(|u| u.url)
    }
}

pub fn parse_page(json: &str) -> Result<Page, RemoteError> {
    page_from_dto(serde_json::from_str(json)?)
}

pub fn parse_page_value(value: Value) -> Result<Page, RemoteError> {
    page_from_dto(serde_json::from_value(value)?)
}

pub fn parse_database(json: &str) -> Result<Database, RemoteError> {
    let dto: DatabaseDto = serde_json::from_str(json)?;
    expect_object(&dto.object, "database")?;

    let columns = dto
        .properties
        .into_iter()
        .map(|(name, column)| {
            let kind = match column.kind.as_str() {
                "select" => ColumnKind::Select(column.select.unwrap_or_default().options),
                "multi_select" => {
                    ColumnKind::MultiSelect(column.multi_select.unwrap_or_default().options)
                }
                other => ColumnKind::Other(other.to_string()),
            };
            let schema = ColumnSchema {
                id: column.id,
                name: column.name.unwrap_or_else(|| name.clone()),
                kind,
            };
            (name, schema)
        })
        .collect();

    Ok(Database {
        id: dto.id,
        title: dto.title,
        last_edited_time: dto.last_edited_time,
        cover_url: dto.cover.and_then(FileDto::into_url),
        columns,
    })
}

/// Parse a paginated query response.
///
/// Results that are not full pages are dropped and counted in
/// [`QueryPage::skipped`]. Full pages that fail validation are dropped with a
/// warning and counted in [`QueryPage::malformed`].
pub fn parse_query(json: &str) -> Result<QueryPage, RemoteError> {
    let list: ListDto = serde_json::from_str(json)?;

    let mut page = QueryPage {
        next_cursor: if list.has_more { list.next_cursor } else { None },
        ..QueryPage::default()
    };

    for result in list.results {
        let is_full_page = result.get("object").and_then(Value::as_str) == Some("page")
            && result.get("properties").is_some();
        let entry_id = result
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match parse_page_value(result) {
            Ok(entry) => page.results.push(entry),
            Err(err) if is_full_page => {
                warn!(entry_id = %entry_id, error = %err, "Dropping malformed database entry");
                page.malformed += 1;
            }
            Err(err) => {
                debug!(entry_id = %entry_id, error = %err, "Skipping query result");
                page.skipped += 1;
            }
        }
    }

    Ok(page)
}

/// Validate one property value payload.
pub fn parse_property(value: &Value) -> Result<PropertyValue, RemoteError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::Malformed("property without a type".to_string()))?;
    let field = || value.get(kind).cloned().unwrap_or(Value::Null);

    let property = match kind {
        "title" => PropertyValue::Title(serde_json::from_value(field())?),
        "checkbox" => PropertyValue::Checkbox(serde_json::from_value(field())?),
        "created_time" => PropertyValue::CreatedTime(serde_json::from_value(field())?),
        "date" => PropertyValue::Date(serde_json::from_value::<Option<DateRange>>(field())?),
        "people" => PropertyValue::People(serde_json::from_value::<Vec<User>>(field())?),
        "select" => PropertyValue::Select(serde_json::from_value(field())?),
        "multi_select" => PropertyValue::MultiSelect(serde_json::from_value(field())?),
        other => PropertyValue::Unsupported {
            kind: other.to_string(),
        },
    };
    Ok(property)
}

fn page_from_dto(dto: PageDto) -> Result<Page, RemoteError> {
    expect_object(&dto.object, "page")?;
    let raw = dto
        .properties
        .ok_or_else(|| RemoteError::Malformed(format!("partial page object {}", dto.id)))?;

    let mut properties = IndexMap::with_capacity(raw.len());
    for (name, value) in raw {
        let property = parse_property(&value).map_err(|err| {
            RemoteError::Malformed(format!("property {:?} of page {}: {}", name, dto.id, err))
        })?;
        properties.insert(name, property);
    }

    Ok(Page {
        id: dto.id,
        last_edited_time: dto.last_edited_time,
        cover_url: dto.cover.and_then(FileDto::into_url),
        properties,
    })
}

fn expect_object(actual: &str, expected: &str) -> Result<(), RemoteError> {
    if actual == expected {
        Ok(())
    } else {
        Err(RemoteError::Malformed(format!(
            "expected a {} object, got {:?}",
            expected, actual
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"{
        "object": "page",
        "id": "page1",
        "last_edited_time": "2024-02-01T10:00:00.000Z",
        "cover": { "type": "external", "external": { "url": "https://img/cover.png" } },
        "url": "https://www.notion.so/page1",
        "properties": {
            "Name": {
                "id": "title",
                "type": "title",
                "title": [
                    { "type": "text", "text": { "content": "Hello " }, "plain_text": "Hello ",
                      "annotations": { "bold": true, "italic": false, "strikethrough": false,
                                       "underline": false, "code": false, "color": "default" } },
                    { "type": "text", "text": { "content": "world" }, "plain_text": "world",
                      "annotations": { "bold": false, "italic": true, "strikethrough": false,
                                       "underline": false, "code": false, "color": "default" } }
                ]
            },
            "Done": { "id": "a", "type": "checkbox", "checkbox": true },
            "Created": { "id": "b", "type": "created_time", "created_time": "2024-01-01T00:00:00.000Z" },
            "Due Date": { "id": "c", "type": "date", "date": { "start": "2024-01-01", "end": null, "time_zone": null } },
            "Owner": { "id": "d", "type": "people", "people": [
                { "object": "user", "id": "u1", "name": "Ada", "type": "person" },
                { "object": "user", "id": "u2" }
            ] },
            "Status": { "id": "e", "type": "select", "select": { "id": "x", "name": "Done", "color": "green" } },
            "Tags": { "id": "f", "type": "multi_select", "multi_select": [ { "id": "y", "name": "a", "color": "red" } ] },
            "Score": { "id": "g", "type": "number", "number": 3 }
        }
    }"#;

    #[test]
    fn test_parse_full_page() {
        let page = parse_page(PAGE).unwrap();

        assert_eq!(page.id, "page1");
        assert_eq!(page.cover_url.as_deref(), Some("https://img/cover.png"));

        let names: Vec<_> = page.properties.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["Name", "Done", "Created", "Due Date", "Owner", "Status", "Tags", "Score"]
        );

        let title = page.title().unwrap();
        assert_eq!(title.len(), 2);
        assert!(title[0].annotations.bold);
        assert!(title[1].annotations.italic);

        assert_eq!(page.property("Done"), Some(&PropertyValue::Checkbox(true)));
        assert_eq!(
            page.property("Due Date"),
            Some(&PropertyValue::Date(Some(DateRange {
                start: Some("2024-01-01".into()),
                end: None,
                time_zone: None,
            })))
        );
        match page.property("Owner") {
            Some(PropertyValue::People(users)) => {
                assert_eq!(users[0].name.as_deref(), Some("Ada"));
                assert_eq!(users[1].name, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            page.property("Score"),
            Some(&PropertyValue::Unsupported {
                kind: "number".into()
            })
        );
    }

    #[test]
    fn test_null_date_and_select() {
        let date = parse_property(&json!({ "type": "date", "date": null })).unwrap();
        assert_eq!(date, PropertyValue::Date(None));

        let select = parse_property(&json!({ "type": "select", "select": null })).unwrap();
        assert_eq!(select, PropertyValue::Select(None));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        assert!(parse_property(&json!({ "type": "checkbox", "checkbox": "yes" })).is_err());
        assert!(parse_property(&json!({ "checkbox": true })).is_err());
    }

    #[test]
    fn test_partial_page_is_rejected() {
        let err = parse_page(r#"{ "object": "page", "id": "p" }"#).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));

        let err = parse_page(r#"{ "object": "database", "id": "p", "properties": {} }"#).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn test_parse_database_schema() {
        let db = parse_database(
            r#"{
                "object": "database",
                "id": "db1",
                "title": [ { "plain_text": "Tasks" } ],
                "cover": { "type": "file", "file": { "url": "https://files/c.png", "expiry_time": "x" } },
                "properties": {
                    "Status": { "id": "s%3D", "name": "Status", "type": "select",
                                "select": { "options": [
                                    { "id": "1", "name": "Done", "color": "green" },
                                    { "id": "2", "name": "Todo", "color": "red" } ] } },
                    "Tags": { "id": "t", "name": "Tags", "type": "multi_select",
                              "multi_select": { "options": [] } },
                    "Name": { "id": "title", "name": "Name", "type": "title", "title": {} }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(db.title[0].plain_text, "Tasks");
        assert_eq!(db.cover_url.as_deref(), Some("https://files/c.png"));
        let names: Vec<_> = db.columns.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Status", "Tags", "Name"]);
        match &db.columns["Status"].kind {
            ColumnKind::Select(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].name, "Done");
                assert_eq!(options[0].color, "green");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(db.columns["Name"].kind, ColumnKind::Other("title".into()));
        assert_eq!(db.columns["Status"].id, "s%3D");
    }

    #[test]
    fn test_parse_query_skips_partial_results() {
        let query = parse_query(
            r#"{
                "object": "list",
                "results": [
                    { "object": "page", "id": "e1", "properties": {} },
                    { "object": "page", "id": "e2" }
                ],
                "next_cursor": "abc",
                "has_more": true
            }"#,
        )
        .unwrap();

        assert_eq!(query.results.len(), 1);
        assert_eq!(query.results[0].id, "e1");
        assert_eq!(query.skipped, 1);
        assert_eq!(query.malformed, 0);
        assert_eq!(query.next_cursor.as_deref(), Some("abc"));

        let last = parse_query(r#"{ "results": [], "next_cursor": "stale", "has_more": false }"#)
            .unwrap();
        assert_eq!(last.next_cursor, None);
    }

    #[test]
    fn test_parse_query_counts_malformed_entries_apart() {
        let query = parse_query(
            r#"{
                "results": [
                    { "object": "page", "id": "good", "properties": {} },
                    { "object": "page", "id": "bad", "properties": {
                        "Done": { "id": "d", "type": "checkbox", "checkbox": "yes" }
                    } },
                    { "object": "database", "id": "db" }
                ],
                "has_more": false
            }"#,
        )
        .unwrap();

        assert_eq!(query.results.len(), 1);
        assert_eq!(query.malformed, 1);
        assert_eq!(query.skipped, 1);
    }
}
