//! # folio-render
//!
//! Article page rendering for folio.
//!
//! This crate renders the standalone HTML article page using Askama. The
//! same page is served as the HTML export and fed to the paged-media
//! engine for PDF output. The JATS XML and plain text records are
//! rendered here too.

pub mod page;
pub mod record;
pub mod templates;

pub use page::{article_page, render_article_page, PageStyle, ARTICLE_CSS, EMPTY_BODY};
pub use record::{render_jats, render_text, NO_CONTENT, UNTITLED};
pub use templates::{ArticlePageTemplate, JatsArticleTemplate, ReferenceItem, TextArticleTemplate};
