//! Print the YAML front matter for an article.

use super::{load_article, load_config};
use anyhow::Result;
use folio_core::FrontMatterBuilder;
use std::path::Path;

pub fn print_front_matter(config_path: &Path, article_path: &Path, lang: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let article = load_article(article_path)?;

    let yaml = FrontMatterBuilder::from_config(&config).build(
        article.metadata_for(lang),
        article.doi(),
        article.first_page,
        article.last_page,
        lang,
    );
    print!("{}", yaml);
    Ok(())
}
