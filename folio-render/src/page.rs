//! Building the article page from an article record.

use crate::templates::{ArticlePageTemplate, ReferenceItem, KATEX_BASE};
use askama::Template;
use folio_core::models::{Article, ReferenceEntry};
use folio_core::render::{render, RenderTarget};

/// Built-in stylesheet for the article page
pub const ARTICLE_CSS: &str = include_str!("../assets/article.css");

/// Body shown when the article has no document
pub const EMPTY_BODY: &str = "<p>No content</p>\n";

/// How the page gets its stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStyle {
    /// CSS embedded in a `<style>` element
    Inline(String),
    /// `<link>` to a stylesheet next to the page
    Linked(String),
}

impl PageStyle {
    /// The built-in stylesheet, inlined.
    pub fn builtin() -> Self {
        PageStyle::Inline(ARTICLE_CSS.to_string())
    }
}

/// Render `article` in `lang` as a complete HTML document.
pub fn render_article_page(
    article: &Article,
    lang: &str,
    style: PageStyle,
) -> Result<String, askama::Error> {
    article_page(article, lang, style).render()
}

/// Assemble the template for `article` in `lang` without rendering it.
pub fn article_page(article: &Article, lang: &str, style: PageStyle) -> ArticlePageTemplate {
    let metadata = article.metadata_for(lang);

    let body = match &article.content {
        Some(node) => render(node, RenderTarget::Html, lang),
        None => EMPTY_BODY.to_string(),
    };

    let (inline_css, stylesheet_href) = match style {
        PageStyle::Inline(css) => (Some(css), None),
        PageStyle::Linked(href) => (None, Some(href)),
    };

    ArticlePageTemplate {
        lang: lang.to_string(),
        title: metadata.and_then(|m| m.title()).map(str::to_string),
        inline_css,
        stylesheet_href,
        katex_base: KATEX_BASE.to_string(),
        doi: article.doi().map(str::to_string),
        abstract_text: metadata
            .and_then(|m| m.abstract_text())
            .map(str::to_string),
        keywords: metadata.map(|m| m.keyword_list()).unwrap_or_default(),
        body,
        references: article
            .references
            .iter()
            .map(|r| reference_item(r, lang))
            .collect(),
    }
}

pub(crate) fn reference_item(reference: &ReferenceEntry, lang: &str) -> ReferenceItem {
    ReferenceItem {
        text: reference
            .text
            .get_or_first(lang)
            .unwrap_or_default()
            .to_string(),
        doi: reference.doi().map(str::to_string),
        url: reference.url().map(str::to_string),
    }
}
