//! Print the BibTeX database for an article's references.

use super::load_article;
use anyhow::Result;
use folio_core::Bibliography;
use std::path::Path;
use tracing::warn;

pub fn print_bibliography(article_path: &Path) -> Result<()> {
    let article = load_article(article_path)?;
    let bibliography = Bibliography::from_references(&article.references);

    if bibliography.is_empty() {
        warn!(article = %article.id, "article has no references");
        return Ok(());
    }
    if let Err(err) = bibliography.validate() {
        warn!(article = %article.id, "{}", err);
    }

    print!("{}", bibliography.to_bibtex());
    Ok(())
}
