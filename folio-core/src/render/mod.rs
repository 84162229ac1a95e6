//! Node renderer: walks a [`Node`] tree and emits Markdown or HTML.
//!
//! Rendering is a pure function of `(node, target, lang)`. Unknown node
//! types render as the empty string; nothing here returns an error.
//!
//! Known limitations:
//! - list items are flattened to inline text, so nested lists lose their
//!   structure;
//! - tables render as a fixed two-column placeholder rather than their
//!   actual rows and cells.

pub mod escape;
mod html;
mod markdown;

use crate::document::{Mark, Node};
use serde::{Deserialize, Serialize};

pub use escape::escape_html;
use html::HtmlEmitter;
use markdown::MarkdownEmitter;

/// Output syntax for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    Markdown,
    Html,
}

impl RenderTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderTarget::Markdown => "markdown",
            RenderTarget::Html => "html",
        }
    }
}

/// Render `node` to `target`.
///
/// # Example
///
/// ```
/// use folio_core::document::Node;
/// use folio_core::render::{render, RenderTarget};
///
/// let doc = Node::Document(vec![Node::heading(2, vec![Node::text("Intro")])]);
/// assert_eq!(render(&doc, RenderTarget::Markdown, "en"), "## Intro\n\n");
/// assert_eq!(render(&doc, RenderTarget::Html, "en"), "<h2>Intro</h2>\n");
/// ```
pub fn render(node: &Node, target: RenderTarget, lang: &str) -> String {
    Renderer::new(target, lang).render(node)
}

/// A configured renderer for one target and language.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    target: RenderTarget,
    lang: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(target: RenderTarget, lang: &'a str) -> Self {
        Self { target, lang }
    }

    pub fn target(&self) -> RenderTarget {
        self.target
    }

    /// Language the output is scoped to; body rendering itself is
    /// language-independent.
    pub fn lang(&self) -> &'a str {
        self.lang
    }

    pub fn render(&self, node: &Node) -> String {
        let mut out = String::new();
        match self.target {
            RenderTarget::Markdown => MarkdownEmitter.block(node, &mut out),
            RenderTarget::Html => HtmlEmitter.block(node, &mut out),
        }
        out
    }
}

/// Target-specific output for the two things both emitters share: block
/// dispatch and inline flattening.
trait Emitter {
    fn block(&self, node: &Node, out: &mut String);

    /// Emit a text run with its marks.
    fn text_run(&self, text: &str, marks: &[Mark], out: &mut String);

    fn math_inline(&self, source: &str, out: &mut String);

    fn hard_break(&self, out: &mut String);

    /// Flatten `nodes` into inline content: text runs with marks, inline
    /// math and hard breaks are emitted, every other node contributes the
    /// inline content of its descendants.
    fn inline(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text { text, marks } => self.text_run(text, marks, out),
                Node::MathInline(source) | Node::MathDisplay(source) => {
                    self.math_inline(source, out)
                }
                Node::HardBreak => self.hard_break(out),
                other => self.inline(other.children(), out),
            }
        }
    }
}

/// Clamp a heading level into `1..=6`.
pub(crate) fn heading_level(level: u8) -> u8 {
    level.clamp(1, 6)
}
