//! Render a document tree to Markdown or HTML.

use anyhow::{Context, Result};
use folio_core::render::{render, RenderTarget};
use folio_core::Node;
use std::path::Path;

pub fn render_document(path: &Path, target: RenderTarget, lang: &str) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    let node = Node::from_json_str(&raw)
        .with_context(|| format!("Invalid document JSON in {}", path.display()))?;

    print!("{}", render(&node, target, lang));
    Ok(())
}
