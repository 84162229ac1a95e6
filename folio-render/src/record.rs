//! Subprocess-free renditions of an article record: JATS XML and plain text.

use crate::page::reference_item;
use crate::templates::{JatsArticleTemplate, TextArticleTemplate};
use askama::Template;
use folio_core::models::Article;

/// Title used when the article has none in the requested language
pub const UNTITLED: &str = "Untitled";

/// Body paragraph used when the article has no document
pub const NO_CONTENT: &str = "No content";

/// Render `article` in `lang` as a JATS XML document.
pub fn render_jats(article: &Article, lang: &str) -> Result<String, askama::Error> {
    let metadata = article.metadata_for(lang);

    JatsArticleTemplate {
        lang: lang.to_string(),
        title: title(article, lang),
        doi: article.doi().map(str::to_string),
        first_page: article.first_page,
        last_page: article.last_page,
        abstract_text: metadata
            .and_then(|m| m.abstract_text())
            .map(str::to_string),
        keywords: metadata.map(|m| m.keyword_list()).unwrap_or_default(),
        paragraphs: paragraphs(article),
        references: article
            .references
            .iter()
            .map(|r| reference_item(r, lang))
            .collect(),
    }
    .render()
}

/// Render `article` in `lang` as plain text.
pub fn render_text(article: &Article, lang: &str) -> Result<String, askama::Error> {
    let metadata = article.metadata_for(lang);
    let title = title(article, lang);

    TextArticleTemplate {
        underline: "=".repeat(title.chars().count()),
        title,
        doi: article.doi().unwrap_or("N/A").to_string(),
        abstract_text: metadata
            .and_then(|m| m.abstract_text())
            .map(|text| text.trim().to_string()),
        keywords: metadata.map(|m| m.keyword_list()).unwrap_or_default(),
        paragraphs: paragraphs(article),
    }
    .render()
}

fn title(article: &Article, lang: &str) -> String {
    article.title_for(lang).unwrap_or(UNTITLED).to_string()
}

fn paragraphs(article: &Article) -> Vec<String> {
    let blocks = article
        .content
        .as_ref()
        .map(|node| node.block_texts())
        .unwrap_or_default();
    if blocks.is_empty() {
        vec![NO_CONTENT.to_string()]
    } else {
        blocks
    }
}
