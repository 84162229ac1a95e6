//! Askama template definitions.

use askama::Template;

/// KaTeX distribution the article page loads its math renderer from
pub const KATEX_BASE: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist";

/// A reference as shown in the numbered list at the end of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    pub text: String,
    pub doi: Option<String>,
    pub url: Option<String>,
}

/// Standalone article page, used for HTML export and as paged-media input
#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticlePageTemplate {
    // Page metadata
    pub lang: String,
    pub title: Option<String>,

    // Stylesheet: inlined, linked, or neither
    pub inline_css: Option<String>,
    pub stylesheet_href: Option<String>,
    pub katex_base: String,

    // Header block
    pub doi: Option<String>,
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,

    // Content (already rendered HTML)
    pub body: String,

    pub references: Vec<ReferenceItem>,
}

/// JATS XML record for archives and indexing services
#[derive(Template)]
#[template(path = "article.jats.xml")]
pub struct JatsArticleTemplate {
    pub lang: String,
    pub title: String,
    pub doi: Option<String>,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    pub paragraphs: Vec<String>,
    pub references: Vec<ReferenceItem>,
}

/// Plain text rendition with an underlined title
#[derive(Template)]
#[template(path = "article.txt")]
pub struct TextArticleTemplate {
    pub title: String,
    pub underline: String,
    pub doi: String,
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    pub paragraphs: Vec<String>,
}
