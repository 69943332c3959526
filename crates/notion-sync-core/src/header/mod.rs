//! Metadata header ("front matter") codec.
//!
//! A document may start with one header block:
//!
//! ```text
//! ---
//! notion-id: 1234
//! notion-type: page
//! ---
//! body...
//! ```
//!
//! The header is kept as an insertion-ordered map of raw string values and is
//! only turned back into text when the document is rendered. Everything outside
//! the header region is carried through byte for byte, and so is every line of
//! an existing block whose key was not changed.

mod editor;

pub use editor::{merge_and_write, HeaderEditor};

use indexmap::IndexMap;
use std::collections::HashSet;

/// Fence line opening and closing a header block
pub const FENCE: &str = "---";

/// Layout artifact some hosts inject into parsed headers; never persisted.
pub const POSITION_KEY: &str = "position";

/// Header key → raw value. Block values keep their continuation lines.
pub type Header = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Whitespace preceding the opening fence
    leading: String,
    header: Option<Header>,
    /// The block as found in the text, if the document had one
    block: Option<Block>,
    /// Everything after the closing fence (starting with its line break)
    body: String,
}

/// An existing header block, line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    /// Text from the opening fence through the closing fence line
    raw: String,
    /// Values as parsed, reserved keys included
    parsed: Header,
    groups: Vec<Group>,
    crlf: bool,
    /// Closing fence line as written
    closing: String,
}

/// Lines of a block. Lines keep a trailing `\r` when the block uses CRLF.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Group {
    /// A `key: value` line and its continuation lines
    Entry { key: String, lines: Vec<String> },
    /// Anything else, such as comments
    Other(String),
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_start();
        let leading_len = text.len() - trimmed.len();

        match parse_header_block(trimmed) {
            Some((block, consumed)) => Self {
                leading: text[..leading_len].to_string(),
                header: Some(block.parsed.clone()),
                block: Some(block),
                body: trimmed[consumed..].to_string(),
            },
            None => Self::without_header(text),
        }
    }

    /// A document whose whole text is body, even if it looks like a header.
    pub fn without_header(body: &str) -> Self {
        Self {
            leading: String::new(),
            header: None,
            block: None,
            body: body.to_string(),
        }
    }

    /// Compose a fresh document: header block, line break, body.
    pub fn with_header(header: Header, body: &str) -> Self {
        Self {
            leading: String::new(),
            header: Some(header),
            block: None,
            body: format!("\n{}", body),
        }
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Body text following the header block
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the header region.
    ///
    /// An existing block is replaced in place: unchanged lines are kept as
    /// written, including lines that are not `key: value` pairs. Without a
    /// block, the new one is prepended and separated from the body by a blank
    /// line. An empty header never creates a block.
    pub fn replace_header(&mut self, header: Header) {
        match self.header {
            Some(_) => self.header = Some(header),
            None if header.is_empty() => {}
            None => {
                self.body = format!("\n\n{}", self.body);
                self.header = Some(header);
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.leading.len() + self.body.len() + 64);
        out.push_str(&self.leading);
        match (&self.header, &self.block) {
            (Some(header), Some(block)) => out.push_str(&block.render(header)),
            (Some(header), None) => out.push_str(&render_header(header)),
            (None, _) => {}
        }
        out.push_str(&self.body);
        out
    }
}

impl Block {
    /// The block rewritten to hold `header`.
    ///
    /// An unchanged header gives back the original text. An emptied header
    /// removes the block.
    fn render(&self, header: &Header) -> String {
        if *header == self.parsed {
            return self.raw.clone();
        }
        if header.is_empty() {
            return String::new();
        }

        let cr = if self.crlf { "\r" } else { "" };
        let mut lines: Vec<String> = Vec::new();
        let mut emitted: HashSet<&str> = HashSet::new();

        for group in &self.groups {
            match group {
                Group::Other(raw) => lines.push(raw.clone()),
                Group::Entry { key, lines: raw } => match header.get(key) {
                    None => {}
                    Some(value) if self.parsed.get(key) == Some(value) => {
                        lines.extend(raw.iter().cloned());
                        emitted.insert(key);
                    }
                    Some(value) => {
                        if emitted.insert(key) {
                            lines.push(header_line(key, value, cr));
                        }
                    }
                },
            }
        }
        for (key, value) in header {
            if !emitted.contains(key.as_str()) {
                lines.push(header_line(key, value, cr));
            }
        }

        let mut out = format!("{}{}\n", FENCE, cr);
        for line in &lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&self.closing);
        out
    }
}

/// `key: value` with the block's line ending inside multi-line values.
fn header_line(key: &str, value: &str, cr: &str) -> String {
    let value = if cr.is_empty() {
        value.to_string()
    } else {
        value.replace('\n', "\r\n")
    };
    format!("{}: {}{}", key, value, cr)
}

/// Parse the header of `text`, dropping the reserved position key.
pub fn read(text: &str) -> Header {
    let mut header = Document::parse(text).header.unwrap_or_default();
    header.shift_remove(POSITION_KEY);
    header
}

/// Existing values overwritten by `changes`, minus `removals`, minus the
/// position key. Keys already present keep their place; new keys are appended.
pub fn merge<'a>(
    existing: &Header,
    changes: &Header,
    removals: impl IntoIterator<Item = &'a str>,
) -> Header {
    let mut merged = existing.clone();
    for (key, value) in changes {
        merged.insert(key.clone(), value.clone());
    }
    for key in removals {
        merged.shift_remove(key);
    }
    merged.shift_remove(POSITION_KEY);
    merged
}

/// Serialize a fresh header block. An empty header renders as nothing.
pub fn render_header(header: &Header) -> String {
    if header.is_empty() {
        return String::new();
    }

    let mut out = String::from(FENCE);
    out.push('\n');
    for (key, value) in header {
        out.push_str(&header_line(key, value, ""));
        out.push('\n');
    }
    out.push_str(FENCE);
    out
}

/// Returns the block and its byte length, closing fence line included.
/// Both `\n` and `\r\n` line endings are recognised.
fn parse_header_block(text: &str) -> Option<(Block, usize)> {
    let after_fence = text.strip_prefix(FENCE)?;
    let (rest, crlf) = match after_fence.strip_prefix("\r\n") {
        Some(rest) => (rest, true),
        None => (after_fence.strip_prefix('\n')?, false),
    };
    let opening_len = text.len() - rest.len();

    let mut lines = Vec::new();
    let mut offset = 0;
    loop {
        let line_end = rest[offset..].find('\n').map(|i| offset + i);
        let line = match line_end {
            Some(end) => &rest[offset..end],
            None => &rest[offset..],
        };

        if line.trim_end() == FENCE {
            let consumed = opening_len + offset + line.len();
            let (parsed, groups) = parse_lines(&lines);
            let block = Block {
                raw: text[..consumed].to_string(),
                parsed,
                groups,
                crlf,
                closing: line.to_string(),
            };
            return Some((block, consumed));
        }

        match line_end {
            Some(end) => {
                lines.push(line);
                offset = end + 1;
            }
            None => return None,
        }
    }
}

fn parse_lines(lines: &[&str]) -> (Header, Vec<Group>) {
    let mut header = Header::new();
    let mut groups = Vec::new();
    let mut current: Option<String> = None;

    for &raw in lines {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if is_continuation(line) {
            if let Some(key) = &current {
                if let Some(value) = header.get_mut(key) {
                    value.push('\n');
                    value.push_str(line);
                }
                if let Some(Group::Entry { lines, .. }) = groups.last_mut() {
                    lines.push(raw.to_string());
                }
            } else {
                groups.push(Group::Other(raw.to_string()));
            }
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) => {
                let key = key.trim().to_string();
                let value = value.strip_prefix(' ').unwrap_or(value).to_string();
                header.insert(key.clone(), value);
                groups.push(Group::Entry {
                    key: key.clone(),
                    lines: vec![raw.to_string()],
                });
                current = Some(key);
            }
            None => {
                groups.push(Group::Other(raw.to_string()));
                current = None;
            }
        }
    }

    (header, groups)
}

/// Indented lines, bare list items and blank lines belong to the previous key.
fn is_continuation(line: &str) -> bool {
    line.is_empty() || line.starts_with(char::is_whitespace) || line.starts_with("- ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(pairs: &[(&str, &str)]) -> Header {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_header_and_body() {
        let doc = Document::parse("---\nnotion-id: abc\nnotion-type: page\n---\n# Title");

        let h = doc.header().unwrap();
        assert_eq!(h.get("notion-id").map(String::as_str), Some("abc"));
        assert_eq!(h.get("notion-type").map(String::as_str), Some("page"));
        assert_eq!(doc.body(), "\n# Title");
    }

    #[test]
    fn test_header_only_at_start() {
        let text = "# Title\n\n---\nkey: value\n---\n";
        let doc = Document::parse(text);
        assert!(!doc.has_header());
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_leading_whitespace_tolerated_and_kept() {
        let text = "\n  \n---\nkey: value\n---\nbody";
        let doc = Document::parse(text);
        assert_eq!(read(text).get("key").map(String::as_str), Some("value"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_unterminated_fence_is_not_a_header() {
        let text = "---\nkey: value\nno closing fence";
        assert!(!Document::parse(text).has_header());
        assert!(read(text).is_empty());
    }

    #[test]
    fn test_empty_header_block() {
        let doc = Document::parse("---\n---\nbody");
        assert!(doc.header().unwrap().is_empty());
        assert_eq!(doc.body(), "\nbody");
    }

    #[test]
    fn test_block_values_round_trip() {
        let text = "---\nnotion-id: 1\nAssignee: \n  - [[Ada]]\n  \n  - [[Linus]]\ntags:\n- one\n- two\n---\n";
        let parsed = read(text);
        assert_eq!(
            parsed.get("Assignee").map(String::as_str),
            Some("\n  - [[Ada]]\n  \n  - [[Linus]]")
        );
        assert_eq!(parsed.get("tags").map(String::as_str), Some("\n- one\n- two"));

        let mut doc = Document::parse(text);
        doc.replace_header(merge(&parsed, &Header::new(), []));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_bare_key_and_comments_survive_a_merge() {
        let text = "---\n# kept for later\ntags:\nnotion-id: 1\n---\nbody";
        let existing = read(text);
        assert_eq!(existing.get("tags").map(String::as_str), Some(""));

        let mut doc = Document::parse(text);
        doc.replace_header(merge(&existing, &header(&[("notion-id", "2")]), []));
        assert_eq!(
            doc.render(),
            "---\n# kept for later\ntags:\nnotion-id: 2\n---\nbody"
        );
    }

    #[test]
    fn test_empty_block_is_kept_when_unchanged() {
        let text = "---\n---\nbody";
        let mut doc = Document::parse(text);
        doc.replace_header(merge(&read(text), &Header::new(), []));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_removed_key_takes_its_block_lines() {
        let text = "---\nkeep: 1\nAssignee:\n  - [[Ada]]\n---\nbody";
        let mut doc = Document::parse(text);
        doc.replace_header(merge(&read(text), &Header::new(), ["Assignee"]));
        assert_eq!(doc.render(), "---\nkeep: 1\n---\nbody");
    }

    #[test]
    fn test_crlf_header_is_recognised() {
        let text = "---\r\ntitle: Hi\r\ntags:\r\n- a\r\n---\r\nbody\r\n";
        let parsed = read(text);
        assert_eq!(parsed.get("title").map(String::as_str), Some("Hi"));
        assert_eq!(parsed.get("tags").map(String::as_str), Some("\n- a"));

        let mut doc = Document::parse(text);
        assert_eq!(doc.body(), "\nbody\r\n");
        doc.replace_header(merge(&parsed, &header(&[("notion-id", "x")]), []));
        assert_eq!(
            doc.render(),
            "---\r\ntitle: Hi\r\ntags:\r\n- a\r\nnotion-id: x\r\n---\r\nbody\r\n"
        );
    }

    #[test]
    fn test_crlf_block_values_keep_line_endings() {
        let text = "---\r\nnotion-id: 1\r\n---\r\n";
        let mut doc = Document::parse(text);
        doc.replace_header(merge(
            &read(text),
            &header(&[("Assignee", "\n  - [[Ada]]")]),
            [],
        ));
        assert_eq!(
            doc.render(),
            "---\r\nnotion-id: 1\r\nAssignee: \r\n  - [[Ada]]\r\n---\r\n"
        );
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let text = "---\nnotion-id: abc\nbanner: \"https://x/y.png\"\nDue-Date: 2024-01-01 -- 2024-01-02\n---\n\nBody with --- inside\n---\n";
        let mut doc = Document::parse(text);
        let existing = read(text);
        doc.replace_header(merge(&existing, &Header::new(), []));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_merge_precedence_and_removals() {
        let existing = header(&[("a", "1"), ("b", "2"), ("position", "x"), ("c", "3")]);
        let changes = header(&[("b", "20"), ("d", "4")]);

        let merged = merge(&existing, &changes, ["c"]);

        let keys: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "d"]);
        assert_eq!(merged["b"], "20");
        assert!(!merged.contains_key(POSITION_KEY));
    }

    #[test]
    fn test_position_dropped_even_if_set() {
        let merged = merge(&Header::new(), &header(&[("position", "1")]), []);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_prepend_adds_blank_line() {
        let mut doc = Document::parse("Hello");
        doc.replace_header(header(&[("notion-id", "1")]));
        assert_eq!(doc.render(), "---\nnotion-id: 1\n---\n\nHello");
    }

    #[test]
    fn test_empty_header_is_not_emitted() {
        let mut doc = Document::parse("Hello");
        doc.replace_header(Header::new());
        assert_eq!(doc.render(), "Hello");

        let mut doc = Document::parse("---\nposition: 1\n---\nHello");
        doc.replace_header(Header::new());
        assert_eq!(doc.render(), "\nHello");
    }

    #[test]
    fn test_with_header() {
        let doc = Document::with_header(header(&[("notion-id", "e1")]), "content");
        assert_eq!(doc.render(), "---\nnotion-id: e1\n---\ncontent");
    }

    #[test]
    fn test_body_that_looks_like_a_header_stays_body() {
        let mut doc = Document::without_header("---\nnot: header\n---\n");
        doc.replace_header(header(&[("k", "v")]));
        assert_eq!(doc.render(), "---\nk: v\n---\n\n---\nnot: header\n---\n");
    }
}
