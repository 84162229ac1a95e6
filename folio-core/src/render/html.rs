//! HTML emitter. All literal text is escaped with [`escape_html`].

use super::{escape_html, heading_level, Emitter};
use crate::document::{normalize_marks, Mark, Node};

/// Fixed stand-in for tables, mirroring the Markdown placeholder.
pub(crate) const TABLE_PLACEHOLDER: &str = "<table>\n  <tr><th>Column 1</th><th>Column 2</th></tr>\n  <tr><td>Cell 1</td><td>Cell 2</td></tr>\n</table>\n";

pub(crate) struct HtmlEmitter;

impl HtmlEmitter {
    fn list_items(&self, items: &[Node], out: &mut String) {
        for item in items {
            out.push_str("  <li>");
            self.inline(std::slice::from_ref(item), out);
            out.push_str("</li>\n");
        }
    }
}

impl Emitter for HtmlEmitter {
    fn block(&self, node: &Node, out: &mut String) {
        match node {
            Node::Document(children) => {
                for child in children {
                    self.block(child, out);
                }
            }
            Node::Heading { level, content } => {
                let level = heading_level(*level);
                out.push_str(&format!("<h{}>", level));
                self.inline(content, out);
                out.push_str(&format!("</h{}>\n", level));
            }
            Node::Paragraph(content) => {
                out.push_str("<p>");
                self.inline(content, out);
                out.push_str("</p>\n");
            }
            Node::BulletList(items) => {
                if items.is_empty() {
                    return;
                }
                out.push_str("<ul>\n");
                self.list_items(items, out);
                out.push_str("</ul>\n");
            }
            Node::OrderedList { start, items } => {
                if items.is_empty() {
                    return;
                }
                if *start == 1 {
                    out.push_str("<ol>\n");
                } else {
                    out.push_str(&format!("<ol start=\"{}\">\n", start));
                }
                self.list_items(items, out);
                out.push_str("</ol>\n");
            }
            Node::ListItem(content) => {
                out.push_str("<li>");
                self.inline(content, out);
                out.push_str("</li>\n");
            }
            Node::CodeBlock { language, .. } => {
                match language {
                    Some(lang) => out.push_str(&format!(
                        "<pre><code class=\"language-{}\">",
                        escape_html(lang)
                    )),
                    None => out.push_str("<pre><code>"),
                }
                out.push_str(&escape_html(&node.plain_text()));
                out.push_str("</code></pre>\n");
            }
            Node::Blockquote(children) => {
                out.push_str("<blockquote>\n");
                for child in children {
                    self.block(child, out);
                }
                out.push_str("</blockquote>\n");
            }
            Node::Table(_) => out.push_str(TABLE_PLACEHOLDER),
            Node::MathInline(source) => self.math_inline(source, out),
            Node::MathDisplay(source) => {
                out.push_str("<div class=\"math-display\">$$");
                out.push_str(&escape_html(source));
                out.push_str("$$</div>\n");
            }
            Node::HorizontalRule => out.push_str("<hr />\n"),
            Node::HardBreak => self.hard_break(out),
            Node::Text { text, marks } => self.text_run(text, marks, out),
            Node::Unknown { .. } => {}
        }
    }

    fn text_run(&self, text: &str, marks: &[Mark], out: &mut String) {
        let marks = normalize_marks(marks);
        for mark in &marks {
            out.push_str(open_tag(*mark));
        }
        out.push_str(&escape_html(text));
        for mark in marks.iter().rev() {
            out.push_str(close_tag(*mark));
        }
    }

    fn math_inline(&self, source: &str, out: &mut String) {
        out.push('$');
        out.push_str(&escape_html(source));
        out.push('$');
    }

    fn hard_break(&self, out: &mut String) {
        out.push_str("<br />");
    }
}

fn open_tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "<strong>",
        Mark::Italic => "<em>",
        Mark::Code => "<code>",
    }
}

fn close_tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "</strong>",
        Mark::Italic => "</em>",
        Mark::Code => "</code>",
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Mark, Node};
    use crate::render::{render, RenderTarget};
    use insta::assert_snapshot;
    use serde_json::json;

    fn html(value: serde_json::Value) -> String {
        render(&Node::from_value(&value), RenderTarget::Html, "en")
    }

    #[test]
    fn test_marks_nest_with_escaped_text() {
        let node = Node::marked("a<b", &[Mark::Code, Mark::Italic, Mark::Bold]);
        assert_eq!(
            render(&node, RenderTarget::Html, "en"),
            "<strong><em><code>a&lt;b</code></em></strong>"
        );
    }

    #[test]
    fn test_document_structure() {
        let out = html(json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Title"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Tom & "},
                    {"type": "text", "text": "Jerry", "marks": [{"type": "italic"}]}
                ]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "one"}]}]},
                    {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "two"}]}]}
                ]},
                {"type": "orderedList", "content": [
                    {"type": "listItem", "content": [{"type": "text", "text": "first"}]}
                ]},
                {"type": "horizontalRule"}
            ]
        }));

        assert_snapshot!(out, @r#"
        <h1>Title</h1>
        <p>Tom &amp; <em>Jerry</em></p>
        <ul>
          <li>one</li>
          <li>two</li>
        </ul>
        <ol>
          <li>first</li>
        </ol>
        <hr />
        "#);
    }

    #[test]
    fn test_code_block_escapes_once() {
        let out = html(json!({
            "type": "codeBlock",
            "content": [{"type": "text", "text": "if a < b && c > d { \"q\" }"}]
        }));
        assert_eq!(
            out,
            "<pre><code>if a &lt; b &amp;&amp; c &gt; d { &quot;q&quot; }</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_language_class() {
        let out = html(json!({
            "type": "codeBlock",
            "attrs": {"language": "rust"},
            "content": [{"type": "text", "text": "fn main() {}"}]
        }));
        assert_eq!(
            out,
            "<pre><code class=\"language-rust\">fn main() {}</code></pre>\n"
        );
    }

    #[test]
    fn test_math_keeps_tex_delimiters() {
        let out = html(json!({
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [{"type": "mathInline", "attrs": {"latex": "a<b"}}]},
                {"type": "mathDisplay", "attrs": {"latex": "\\sum_i x_i"}}
            ]
        }));
        assert_eq!(
            out,
            "<p>$a&lt;b$</p>\n<div class=\"math-display\">$$\\sum_i x_i$$</div>\n"
        );
    }

    #[test]
    fn test_blockquote_renders_child_blocks() {
        let out = html(json!({
            "type": "blockquote",
            "content": [{"type": "paragraph", "content": [{"type": "text", "text": "quoted"}]}]
        }));
        assert_eq!(out, "<blockquote>\n<p>quoted</p>\n</blockquote>\n");
    }

    #[test]
    fn test_ordered_list_start_attribute() {
        let out = html(json!({
            "type": "orderedList",
            "attrs": {"start": 5},
            "content": [{"type": "listItem", "content": [{"type": "text", "text": "five"}]}]
        }));
        assert_eq!(out, "<ol start=\"5\">\n  <li>five</li>\n</ol>\n");
    }

    #[test]
    fn test_table_is_fixed_placeholder() {
        let out = html(json!({"type": "table", "content": []}));
        assert_eq!(out, super::TABLE_PLACEHOLDER);
    }

    #[test]
    fn test_quotes_are_escaped_in_text() {
        let out = html(json!({
            "type": "paragraph",
            "content": [{"type": "text", "text": "say \"hi\" it's"}]
        }));
        assert_eq!(out, "<p>say &quot;hi&quot; it&#39;s</p>\n");
    }
}
