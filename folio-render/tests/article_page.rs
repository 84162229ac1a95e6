use folio_core::models::Article;
use folio_render::{render_article_page, PageStyle, ARTICLE_CSS};

fn article(json: serde_json::Value) -> Article {
    serde_json::from_value(json).unwrap()
}

fn sample() -> Article {
    article(serde_json::json!({
        "id": "42",
        "content": {
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Intro"}]},
                {"type": "paragraph", "content": [{"type": "mathInline", "attrs": {"latex": "x^2"}}]}
            ]
        },
        "metadata": {
            "en": {"title": "Fish & Chips", "abstract": "On <frying>.", "keywords": "food, oil"},
            "ru": {"title": "Рыба"}
        },
        "doi": "10.1000/fish",
        "references": [
            {"id": "r1", "text": {"ru": "Первый", "en": "First"}, "doi": "10.1/a"},
            {"text": {"ru": "Только русский"}, "url": "https://example.org/ru"}
        ]
    }))
}

#[test]
fn page_has_header_body_and_references() {
    let html = render_article_page(&sample(), "en", PageStyle::builtin()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"<html lang="en">"#));
    // askama escapes with numeric entities
    assert!(html.contains("<title>Fish &#38; Chips</title>"));
    assert!(html.contains(r#"<h1 class="article-title">Fish &#38; Chips</h1>"#));
    assert!(html.contains(r#"<a href="https://doi.org/10.1000/fish">10.1000/fish</a>"#));
    assert!(html.contains("<p>On &#60;frying&#62;.</p>"));
    assert!(html.contains("<strong>Keywords:</strong> food, oil"));
    assert!(html.contains("<h2>Intro</h2>"));
    assert!(html.contains("<p>$x^2$</p>"));
    assert!(html.contains("renderMathInElement"));
}

#[test]
fn references_prefer_requested_language_then_first() {
    let html = render_article_page(&sample(), "en", PageStyle::builtin()).unwrap();

    assert!(html.contains(
        r#"<li>First DOI: <a href="https://doi.org/10.1/a">10.1/a</a></li>"#
    ));
    assert!(html.contains(
        r#"<li>Только русский <a href="https://example.org/ru">https://example.org/ru</a></li>"#
    ));
}

#[test]
fn stylesheet_is_inlined_or_linked() {
    let inline = render_article_page(&sample(), "en", PageStyle::builtin()).unwrap();
    assert!(inline.contains("<style>"));
    assert!(inline.contains("size: A4;"));
    assert!(!inline.contains(r#"href="style.css""#));
    assert!(ARTICLE_CSS.contains("@page"));

    let linked =
        render_article_page(&sample(), "ru", PageStyle::Linked("style.css".into())).unwrap();
    assert!(linked.contains(r#"<link rel="stylesheet" href="style.css">"#));
    assert!(!linked.contains("<style>"));
    assert!(linked.contains("<title>Рыба</title>"));
}

#[test]
fn missing_document_shows_placeholder() {
    let bare = article(serde_json::json!({"id": "7", "content": null}));
    let html = render_article_page(&bare, "en", PageStyle::Linked("style.css".into())).unwrap();

    assert!(html.contains("<p>No content</p>"));
    assert!(!html.contains("<title>"));
    assert!(!html.contains("article-references"));
    assert!(!html.contains("article-doi"));
}
