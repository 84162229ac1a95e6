//! YAML front matter for the converter.
//!
//! The block is prepended to the Markdown body so the converter picks up
//! title, abstract, keywords, pagination and the typesetting options.

use crate::config::ExportConfig;
use crate::models::ArticleMetadata;
use std::fmt::Write;

/// Name of the bibliography file written beside the Markdown source.
pub const BIBLIOGRAPHY_FILE: &str = "references.bib";

/// Builds YAML preambles with a fixed set of typesetting options.
#[derive(Debug, Clone)]
pub struct FrontMatterBuilder {
    document_class: String,
    font_size: String,
    paper_size: String,
    margin: String,
    bibliography_file: String,
    citation_style: String,
}

impl Default for FrontMatterBuilder {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl FrontMatterBuilder {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            document_class: "article".to_string(),
            font_size: config.font_size.clone(),
            paper_size: config.paper_size.clone(),
            margin: config.margin.clone(),
            bibliography_file: BIBLIOGRAPHY_FILE.to_string(),
            citation_style: config.citation_style.clone(),
        }
    }

    /// Build the `---` delimited preamble for one language.
    ///
    /// Optional keys (`title`, `abstract`, `keywords`, `doi`, `first-page`,
    /// `last-page`) are left out entirely when there is nothing to put in them.
    pub fn build(
        &self,
        metadata: Option<&ArticleMetadata>,
        doi: Option<&str>,
        first_page: Option<u32>,
        last_page: Option<u32>,
        lang: &str,
    ) -> String {
        let mut yaml = String::from("---\n");

        if let Some(meta) = metadata {
            if let Some(title) = meta.title() {
                let _ = writeln!(yaml, "title: \"{}\"", escape_scalar(title));
            }

            if let Some(abstract_text) = meta.abstract_text() {
                // explicit indent: the first line may itself start with spaces
                yaml.push_str("abstract: |2\n");
                for line in abstract_text.lines() {
                    let _ = writeln!(yaml, "  {}", line);
                }
            }

            let keywords = meta.keyword_list();
            if !keywords.is_empty() {
                let quoted: Vec<String> = keywords
                    .iter()
                    .map(|k| format!("\"{}\"", escape_scalar(k)))
                    .collect();
                let _ = writeln!(yaml, "keywords: [{}]", quoted.join(", "));
            }
        }

        if let Some(doi) = doi.filter(|d| !d.trim().is_empty()) {
            let _ = writeln!(yaml, "doi: \"{}\"", escape_scalar(doi.trim()));
        }
        if let Some(page) = first_page {
            let _ = writeln!(yaml, "first-page: {}", page);
        }
        if let Some(page) = last_page {
            let _ = writeln!(yaml, "last-page: {}", page);
        }

        let _ = writeln!(yaml, "lang: {}", language_name(lang));
        let _ = writeln!(yaml, "documentclass: {}", self.document_class);
        let _ = writeln!(
            yaml,
            "classoption: [{}, {}]",
            self.font_size, self.paper_size
        );
        let _ = writeln!(yaml, "geometry: margin={}", self.margin);
        let _ = writeln!(yaml, "bibliography: {}", self.bibliography_file);
        let _ = writeln!(yaml, "citation-style: {}", self.citation_style);
        yaml.push_str("---\n");

        yaml
    }
}

/// Typesetter language name for an ISO 639-1 code.
pub fn language_name(lang: &str) -> &'static str {
    match lang.trim().to_ascii_lowercase().as_str() {
        "ru" => "russian",
        "uk" => "ukrainian",
        "de" => "german",
        "fr" => "french",
        "es" => "spanish",
        _ => "english",
    }
}

/// Escape a value for a double-quoted single-line YAML scalar.
fn escape_scalar(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn metadata(title: &str, abstract_text: &str, keywords: &str) -> ArticleMetadata {
        ArticleMetadata {
            title: Some(title.to_string()),
            abstract_text: Some(abstract_text.to_string()),
            keywords: Some(keywords.to_string()),
        }
    }

    #[test]
    fn test_full_preamble() {
        let meta = metadata("On Typesetting", "First line.\nSecond line.", "tex, yaml");
        let yaml = FrontMatterBuilder::default().build(
            Some(&meta),
            Some("10.1000/xyz"),
            Some(3),
            Some(17),
            "en",
        );

        insta::assert_snapshot!(yaml, @r#"
        ---
        title: "On Typesetting"
        abstract: |2
          First line.
          Second line.
        keywords: ["tex", "yaml"]
        doi: "10.1000/xyz"
        first-page: 3
        last-page: 17
        lang: english
        documentclass: article
        classoption: [12pt, a4paper]
        geometry: margin=2.5cm
        bibliography: references.bib
        citation-style: gost-numeric
        ---
        "#);
    }

    #[test]
    fn test_absent_pagination_and_doi_are_omitted() {
        let meta = metadata("T", "A", "k");
        let yaml = FrontMatterBuilder::default().build(Some(&meta), None, None, None, "en");

        assert!(!yaml.contains("doi:"));
        assert!(!yaml.contains("first-page"));
        assert!(!yaml.contains("last-page"));

        let yaml = FrontMatterBuilder::default().build(Some(&meta), Some("  "), None, None, "en");
        assert!(!yaml.contains("doi:"));
    }

    #[test]
    fn test_output_parses_as_yaml() {
        let meta = metadata(
            "Quotes \"inside\"\nand a break \\ slash",
            "Line one\n\nLine three: with colon",
            " alpha , beta,,gamma ",
        );
        let yaml = FrontMatterBuilder::default().build(Some(&meta), Some("10.1/a"), Some(1), None, "ru");
        let body = yaml
            .trim_start_matches("---\n")
            .trim_end_matches("---\n");
        let parsed: Value = serde_yaml::from_str(body).unwrap();

        assert_eq!(
            parsed["title"].as_str(),
            Some("Quotes \"inside\" and a break \\ slash")
        );
        assert_eq!(
            parsed["abstract"].as_str(),
            Some("Line one\n\nLine three: with colon\n")
        );
        let keywords: Vec<&str> = parsed["keywords"]
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keywords, vec!["alpha", "beta", "gamma"]);
        assert_eq!(parsed["lang"].as_str(), Some("russian"));
        assert_eq!(parsed["first-page"].as_u64(), Some(1));
        assert!(parsed.get("last-page").is_none());
    }

    #[test]
    fn test_abstract_with_leading_indent_parses() {
        let meta = metadata("T", "    indented start\nnormal", "k");
        let yaml = FrontMatterBuilder::default().build(Some(&meta), None, None, None, "en");
        let body = yaml
            .trim_start_matches("---\n")
            .trim_end_matches("---\n");
        let parsed: Value = serde_yaml::from_str(body).unwrap();

        assert_eq!(
            parsed["abstract"].as_str(),
            Some("    indented start\nnormal\n")
        );
        assert_eq!(parsed["lang"].as_str(), Some("english"));
    }

    #[test]
    fn test_missing_metadata_still_emits_fixed_keys() {
        let yaml = FrontMatterBuilder::default().build(None, None, None, None, "de");
        assert!(!yaml.contains("title:"));
        assert!(yaml.contains("lang: german\n"));
        assert!(yaml.contains("documentclass: article\n"));
        assert!(yaml.contains("bibliography: references.bib\n"));
    }

    #[test]
    fn test_builder_follows_config() {
        let config = ExportConfig {
            font_size: "11pt".into(),
            margin: "2cm".into(),
            citation_style: "apa".into(),
            ..ExportConfig::default()
        };
        let yaml = FrontMatterBuilder::from_config(&config).build(None, None, None, None, "en");
        assert!(yaml.contains("classoption: [11pt, a4paper]\n"));
        assert!(yaml.contains("geometry: margin=2cm\n"));
        assert!(yaml.contains("citation-style: apa\n"));
    }

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("ru"), "russian");
        assert_eq!(language_name("UK"), "ukrainian");
        assert_eq!(language_name("pt"), "english");
    }
}
