//! Markdown emitter. Literal text passes through unescaped.

use super::{heading_level, Emitter};
use crate::document::{normalize_marks, Mark, Node};

/// Fixed stand-in for tables; structural table conversion is not implemented.
pub(crate) const TABLE_PLACEHOLDER: &str =
    "\n| Column 1 | Column 2 |\n|----------|----------|\n| Cell 1   | Cell 2   |\n\n";

pub(crate) struct MarkdownEmitter;

impl Emitter for MarkdownEmitter {
    fn block(&self, node: &Node, out: &mut String) {
        match node {
            Node::Document(children) => {
                for child in children {
                    self.block(child, out);
                }
            }
            Node::Heading { level, content } => {
                out.push_str(&"#".repeat(heading_level(*level) as usize));
                out.push(' ');
                self.inline(content, out);
                out.push_str("\n\n");
            }
            Node::Paragraph(content) => {
                self.inline(content, out);
                out.push_str("\n\n");
            }
            Node::BulletList(items) => {
                if items.is_empty() {
                    return;
                }
                for item in items {
                    out.push_str("- ");
                    self.inline(std::slice::from_ref(item), out);
                    out.push('\n');
                }
                out.push('\n');
            }
            Node::OrderedList { start, items } => {
                if items.is_empty() {
                    return;
                }
                for (number, item) in (*start..).zip(items) {
                    out.push_str(&format!("{}. ", number));
                    self.inline(std::slice::from_ref(item), out);
                    out.push('\n');
                }
                out.push('\n');
            }
            Node::ListItem(content) => {
                out.push_str("- ");
                self.inline(content, out);
                out.push('\n');
            }
            Node::CodeBlock { language, .. } => {
                out.push_str("```");
                if let Some(lang) = language {
                    out.push_str(lang);
                }
                out.push('\n');
                out.push_str(&node.plain_text());
                out.push_str("\n```\n\n");
            }
            Node::Blockquote(children) => {
                let mut inner = String::new();
                for child in children {
                    self.block(child, &mut inner);
                }
                let inner = inner.trim_end_matches('\n');
                for line in inner.split('\n') {
                    if line.is_empty() {
                        out.push_str(">\n");
                    } else {
                        out.push_str("> ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                out.push('\n');
            }
            Node::Table(_) => out.push_str(TABLE_PLACEHOLDER),
            Node::MathInline(source) => self.math_inline(source, out),
            Node::MathDisplay(source) => {
                out.push_str("\n$$\n");
                out.push_str(source);
                out.push_str("\n$$\n\n");
            }
            Node::HorizontalRule => out.push_str("\n---\n\n"),
            Node::HardBreak => self.hard_break(out),
            Node::Text { text, marks } => self.text_run(text, marks, out),
            Node::Unknown { .. } => {}
        }
    }

    fn text_run(&self, text: &str, marks: &[Mark], out: &mut String) {
        let mut run = text.to_string();
        for mark in normalize_marks(marks).iter().rev() {
            run = match mark {
                Mark::Bold => format!("**{}**", run),
                Mark::Italic => format!("*{}*", run),
                Mark::Code => format!("`{}`", run),
            };
        }
        out.push_str(&run);
    }

    fn math_inline(&self, source: &str, out: &mut String) {
        out.push('$');
        out.push_str(source);
        out.push('$');
    }

    fn hard_break(&self, out: &mut String) {
        out.push_str("\\\n");
    }
}
