//! Rich-text document tree decoded from editor JSON.
//!
//! The editor stores documents as a tree of `{type, attrs, content, text, marks}`
//! objects. Decoding never fails: node types outside the known set become
//! [`Node::Unknown`] (keeping their children so their text still flattens into
//! surrounding inline content), and missing attributes fall back to defaults.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Inline formatting mark on a text run.
///
/// The derived ordering is the nesting precedence used by every renderer:
/// `Bold` wraps outermost, `Code` innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Code,
}

impl Mark {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bold" | "strong" => Some(Mark::Bold),
            "italic" | "em" => Some(Mark::Italic),
            "code" => Some(Mark::Code),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Code => "code",
        }
    }
}

/// Sort and dedupe marks into nesting order (outermost first).
pub fn normalize_marks(marks: &[Mark]) -> Vec<Mark> {
    let mut ordered = marks.to_vec();
    ordered.sort();
    ordered.dedup();
    ordered
}

/// A node in the document tree.
///
/// Only [`Node::Text`] carries literal text and marks; containers carry
/// their ordered children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Document(Vec<Node>),
    Heading { level: u8, content: Vec<Node> },
    Paragraph(Vec<Node>),
    BulletList(Vec<Node>),
    OrderedList { start: u64, items: Vec<Node> },
    ListItem(Vec<Node>),
    CodeBlock { language: Option<String>, content: Vec<Node> },
    Blockquote(Vec<Node>),
    Table(Vec<Node>),
    MathInline(String),
    MathDisplay(String),
    HorizontalRule,
    HardBreak,
    Text { text: String, marks: Vec<Mark> },
    /// Unrecognised or missing `type`; renders as nothing.
    Unknown { kind: Option<String>, content: Vec<Node> },
}

impl Node {
    /// Decode a node from an arbitrary JSON value.
    ///
    /// A JSON string is treated as a serialized document (the platform stores
    /// editor JSON as a string field) and decoded recursively.
    pub fn from_value(value: &Value) -> Node {
        if let Value::String(raw) = value {
            return match serde_json::from_str::<Value>(raw) {
                Ok(inner) if inner.is_object() => Node::from_value(&inner),
                _ => Node::unknown(None),
            };
        }

        let kind = value.get("type").and_then(Value::as_str);
        match kind {
            Some("doc" | "document") => Node::Document(children_of(value)),
            Some("heading") => Node::Heading {
                level: attr_u64(value, "level")
                    .map(|l| l.min(u8::MAX as u64) as u8)
                    .unwrap_or(1),
                content: children_of(value),
            },
            Some("paragraph") => Node::Paragraph(children_of(value)),
            Some("bulletList" | "bullet_list") => Node::BulletList(children_of(value)),
            Some("orderedList" | "ordered_list") => Node::OrderedList {
                start: attr_u64(value, "start").unwrap_or(1),
                items: children_of(value),
            },
            Some("listItem" | "list_item") => Node::ListItem(children_of(value)),
            Some("codeBlock" | "code_block") => Node::CodeBlock {
                language: attr_str(value, "language")
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
                content: children_of(value),
            },
            Some("blockquote") => Node::Blockquote(children_of(value)),
            Some("table") => Node::Table(children_of(value)),
            Some("mathInline" | "math_inline") => Node::MathInline(math_source(value)),
            Some("mathDisplay" | "math_display") => Node::MathDisplay(math_source(value)),
            Some("horizontalRule" | "horizontal_rule") => Node::HorizontalRule,
            Some("hardBreak" | "hard_break") => Node::HardBreak,
            Some("text") => Node::Text {
                text: value
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                marks: marks_of(value),
            },
            other => Node::Unknown {
                kind: other.map(str::to_string),
                content: children_of(value),
            },
        }
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Node, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Node::from_value(&value))
    }

    pub fn text(text: impl Into<String>) -> Node {
        Node::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: &[Mark]) -> Node {
        Node::Text {
            text: text.into(),
            marks: marks.to_vec(),
        }
    }

    pub fn paragraph(content: Vec<Node>) -> Node {
        Node::Paragraph(content)
    }

    pub fn heading(level: u8, content: Vec<Node>) -> Node {
        Node::Heading { level, content }
    }

    pub fn unknown(kind: Option<&str>) -> Node {
        Node::Unknown {
            kind: kind.map(str::to_string),
            content: Vec::new(),
        }
    }

    /// The editor's type tag for this node.
    pub fn type_name(&self) -> &str {
        match self {
            Node::Document(_) => "doc",
            Node::Heading { .. } => "heading",
            Node::Paragraph(_) => "paragraph",
            Node::BulletList(_) => "bulletList",
            Node::OrderedList { .. } => "orderedList",
            Node::ListItem(_) => "listItem",
            Node::CodeBlock { .. } => "codeBlock",
            Node::Blockquote(_) => "blockquote",
            Node::Table(_) => "table",
            Node::MathInline(_) => "mathInline",
            Node::MathDisplay(_) => "mathDisplay",
            Node::HorizontalRule => "horizontalRule",
            Node::HardBreak => "hardBreak",
            Node::Text { .. } => "text",
            Node::Unknown { kind, .. } => kind.as_deref().unwrap_or(""),
        }
    }

    /// Child nodes in document order (empty for leaves).
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(c)
            | Node::Paragraph(c)
            | Node::BulletList(c)
            | Node::ListItem(c)
            | Node::Blockquote(c)
            | Node::Table(c) => c,
            Node::Heading { content, .. }
            | Node::CodeBlock { content, .. }
            | Node::Unknown { content, .. } => content,
            Node::OrderedList { items, .. } => items,
            Node::MathInline(_)
            | Node::MathDisplay(_)
            | Node::HorizontalRule
            | Node::HardBreak
            | Node::Text { .. } => &[],
        }
    }

    /// Concatenated literal text of all descendant text nodes, marks ignored.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(self, &mut out);
        out
    }

    /// Plain text of each leaf block in document order, blank blocks skipped.
    ///
    /// Containers (lists, list items, blockquotes) are walked into; tables
    /// and rules contribute nothing. Display math contributes its source.
    pub fn block_texts(&self) -> Vec<String> {
        let mut blocks = Vec::new();
        collect_block_texts(self, &mut blocks);
        blocks
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Document(Vec::new())
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from_value(value)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Node::from_value(&value))
    }
}

fn collect_plain_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text, .. } => out.push_str(text),
        Node::HardBreak => out.push('\n'),
        other => {
            for child in other.children() {
                collect_plain_text(child, out);
            }
        }
    }
}

fn collect_block_texts(node: &Node, out: &mut Vec<String>) {
    let text = match node {
        Node::Document(children)
        | Node::BulletList(children)
        | Node::OrderedList { items: children, .. }
        | Node::ListItem(children)
        | Node::Blockquote(children)
        | Node::Unknown {
            content: children, ..
        } => {
            for child in children {
                collect_block_texts(child, out);
            }
            return;
        }
        Node::Table(_) | Node::HorizontalRule => return,
        Node::MathDisplay(source) => source.clone(),
        other => other.plain_text(),
    };
    let text = text.trim();
    if !text.is_empty() {
        out.push(text.to_string());
    }
}

fn children_of(value: &Value) -> Vec<Node> {
    value
        .get("content")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(Node::from_value).collect())
        .unwrap_or_default()
}

fn attr(value: &Value, key: &str) -> Option<Value> {
    value.get("attrs").and_then(|attrs| attrs.get(key)).cloned()
}

fn attr_u64(value: &Value, key: &str) -> Option<u64> {
    match attr(value, key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn attr_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get("attrs")
        .and_then(|attrs| attrs.get(key))
        .and_then(Value::as_str)
}

fn math_source(value: &Value) -> String {
    attr_str(value, "latex")
        .or_else(|| attr_str(value, "source"))
        .unwrap_or_default()
        .to_string()
}

fn marks_of(value: &Value) -> Vec<Mark> {
    value
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| {
            marks
                .iter()
                .filter_map(|mark| {
                    let name = mark
                        .get("type")
                        .and_then(Value::as_str)
                        .or_else(|| mark.as_str())?;
                    Mark::from_str(name)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_heading_with_text() {
        let node = Node::from_value(&json!({
            "type": "doc",
            "content": [{
                "type": "heading",
                "attrs": {"level": 2},
                "content": [{"type": "text", "text": "Intro"}]
            }]
        }));

        assert_eq!(
            node,
            Node::Document(vec![Node::heading(2, vec![Node::text("Intro")])])
        );
    }

    #[test]
    fn test_decode_accepts_snake_case_names() {
        let node = Node::from_value(&json!({
            "type": "math_display",
            "attrs": {"latex": "E = mc^2"}
        }));
        assert_eq!(node, Node::MathDisplay("E = mc^2".into()));

        let node = Node::from_value(&json!({"type": "code_block", "attrs": {"language": "rust"}}));
        assert_eq!(
            node,
            Node::CodeBlock {
                language: Some("rust".into()),
                content: vec![]
            }
        );
    }

    #[test]
    fn test_unknown_type_keeps_children() {
        let node = Node::from_value(&json!({
            "type": "callout",
            "content": [{"type": "text", "text": "kept"}]
        }));

        assert_eq!(node.type_name(), "callout");
        assert_eq!(node.plain_text(), "kept");
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let node = Node::from_value(&json!({"attrs": {"level": 3}}));
        assert!(matches!(node, Node::Unknown { kind: None, .. }));

        let node = Node::from_value(&json!(42));
        assert!(matches!(node, Node::Unknown { kind: None, .. }));
    }

    #[test]
    fn test_marks_decode_with_aliases_and_skip_unknown() {
        let node = Node::from_value(&json!({
            "type": "text",
            "text": "x",
            "marks": [{"type": "em"}, {"type": "link"}, {"type": "strong"}]
        }));

        assert_eq!(node, Node::marked("x", &[Mark::Italic, Mark::Bold]));
    }

    #[test]
    fn test_normalize_marks_orders_by_precedence() {
        assert_eq!(
            normalize_marks(&[Mark::Code, Mark::Italic, Mark::Bold, Mark::Italic]),
            vec![Mark::Bold, Mark::Italic, Mark::Code]
        );
    }

    #[test]
    fn test_heading_level_defaults_to_one() {
        let node = Node::from_value(&json!({"type": "heading", "content": []}));
        assert_eq!(node, Node::heading(1, vec![]));
    }

    #[test]
    fn test_string_value_is_parsed_as_document() {
        let raw = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"hi"}]}]}"#;
        let node = Node::from_value(&Value::String(raw.to_string()));
        assert_eq!(node.plain_text(), "hi");
    }

    #[test]
    fn test_block_texts_walk_containers() {
        let node = Node::from_value(&json!({
            "type": "doc",
            "content": [
                {"type": "heading", "content": [{"type": "text", "text": "Title"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "One "},
                    {"type": "text", "text": "two", "marks": ["bold"]}
                ]},
                {"type": "paragraph", "content": []},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "item"}]}
                    ]}
                ]},
                {"type": "table", "content": [{"type": "text", "text": "hidden"}]},
                {"type": "mathDisplay", "attrs": {"latex": "a^2"}},
                {"type": "horizontalRule"}
            ]
        }));

        assert_eq!(node.block_texts(), vec!["Title", "One two", "item", "a^2"]);
    }

    #[test]
    fn test_deserialize_via_serde() {
        let node: Node = serde_json::from_str(r#"{"type":"horizontalRule"}"#).unwrap();
        assert_eq!(node, Node::HorizontalRule);
    }
}
