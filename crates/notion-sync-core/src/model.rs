use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque remote object identifier
pub type NotionId = String;

/// What the caller believes a remote id points to.
/// Stored in the `notion-type` header key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Page,
    Database,
    Unknown,
}

impl ObjectKind {
    /// Header value for a resolved kind. `Unknown` is never written.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Page => "page",
            ObjectKind::Database => "database",
            ObjectKind::Unknown => "",
        }
    }

    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(str::trim) {
            Some("page") => ObjectKind::Page,
            Some("database") => ObjectKind::Database,
            _ => ObjectKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObjectRef {
    pub id: NotionId,
    pub kind: ObjectKind,
}

impl RemoteObjectRef {
    pub fn new(id: impl Into<NotionId>, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Page or database, as resolved by the remote client
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteObject {
    Page(Page),
    Database(Database),
}

impl RemoteObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            RemoteObject::Page(_) => ObjectKind::Page,
            RemoteObject::Database(_) => ObjectKind::Database,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RemoteObject::Page(page) => &page.id,
            RemoteObject::Database(database) => &database.id,
        }
    }

    pub fn cover_url(&self) -> Option<&str> {
        match self {
            RemoteObject::Page(page) => page.cover_url.as_deref(),
            RemoteObject::Database(database) => database.cover_url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: NotionId,
    pub last_edited_time: String,
    pub cover_url: Option<String>,
    pub properties: IndexMap<String, PropertyValue>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The first `title` property, which every Notion page carries exactly once.
    pub fn title(&self) -> Option<&[RichTextRun]> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::Title(runs) => Some(runs.as_slice()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    pub id: NotionId,
    pub title: Vec<RichTextRun>,
    pub last_edited_time: String,
    pub cover_url: Option<String>,
    pub columns: IndexMap<String, ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub id: String,
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Select(Vec<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    /// Any other column type, carrying the remote type name
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Typed property value. Only the fields of the active variant exist.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(Vec<RichTextRun>),
    Checkbox(bool),
    CreatedTime(String),
    Date(Option<DateRange>),
    People(Vec<User>),
    Select(Option<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    /// Kinds this projection does not render
    Unsupported { kind: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
    pub time_zone: Option<String>,
}

/// Remote user. `name` is only known for full user objects;
/// partial users carry just the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextRun {
    pub plain_text: String,
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichTextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            annotations: Annotations::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}
