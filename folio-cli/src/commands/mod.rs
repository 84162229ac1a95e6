//! CLI command implementations.

pub mod bibliography;
pub mod check;
pub mod export;
pub mod front_matter;
pub mod render;

pub use bibliography::print_bibliography;
pub use check::check_tools;
pub use export::export_article;
pub use front_matter::print_front_matter;
pub use render::render_document;

use anyhow::{Context, Result};
use folio_core::{Article, ExportConfig};
use std::path::Path;

/// Load the export configuration, using defaults when the file does not exist.
fn load_config(config_path: &Path) -> Result<ExportConfig> {
    ExportConfig::load_or_default(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))
}

fn load_article(path: &Path) -> Result<Article> {
    Article::from_file(path).with_context(|| format!("Failed to read article {}", path.display()))
}
