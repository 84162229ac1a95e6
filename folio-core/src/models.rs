//! Article record: per-language metadata, references and the document body.

use crate::document::Node;
use folio_types::DocId;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("Failed to read article file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid article JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Title, abstract and keywords for one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    #[serde(default)]
    pub title: Option<String>,

    /// Abstract text; the platform calls it `annotation`.
    #[serde(default, rename = "abstract", alias = "annotation")]
    pub abstract_text: Option<String>,

    /// Comma-separated keyword string
    #[serde(default)]
    pub keywords: Option<String>,
}

impl ArticleMetadata {
    /// Keywords split on commas, trimmed, empties dropped.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Language → text map that remembers insertion order.
///
/// "First available language" means the first key as it appeared in the
/// input, not the alphabetically first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText(Vec<(String, String)>);

impl LocalizedText {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace, keeping the original position of an existing key.
    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        let lang = lang.into();
        let text = text.into();
        match self.0.iter_mut().find(|(l, _)| *l == lang) {
            Some(slot) => slot.1 = text,
            None => self.0.push((lang, text)),
        }
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == lang)
            .map(|(_, text)| text.as_str())
    }

    /// Text for the first language encountered.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, text)| text.as_str())
    }

    /// Text for `lang`, falling back to the first language encountered.
    pub fn get_or_first(&self, lang: &str) -> Option<&str> {
        self.get(lang).or_else(|| self.first())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut text = LocalizedText::new();
        for (lang, value) in iter {
            text.insert(lang, value);
        }
        text
    }
}

impl Serialize for LocalizedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (lang, text) in &self.0 {
            map.serialize_entry(lang, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = LocalizedText;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language code to text")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(LocalizedText::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut text = LocalizedText::new();
                while let Some((lang, value)) = access.next_entry::<String, Option<String>>()? {
                    // null translations are treated as absent
                    if let Some(value) = value {
                        text.insert(lang, value);
                    }
                }
                Ok(text)
            }
        }

        deserializer.deserialize_any(OrderedVisitor)
    }
}

/// One bibliography entry with per-language text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub text: LocalizedText,

    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl ReferenceEntry {
    pub fn doi(&self) -> Option<&str> {
        non_empty(self.doi.as_deref())
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }
}

/// The slice of an article record the export engine reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: DocId,

    /// Editor document tree; the platform's `pmJson` may hold it as a string.
    #[serde(default, alias = "pmJson", alias = "pm_json")]
    pub content: Option<Node>,

    #[serde(default)]
    pub metadata: BTreeMap<String, ArticleMetadata>,

    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default, alias = "first_page")]
    pub first_page: Option<u32>,

    #[serde(default, alias = "last_page")]
    pub last_page: Option<u32>,

    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
}

impl Article {
    pub fn from_json_str(raw: &str) -> Result<Self, ArticleError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArticleError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn metadata_for(&self, lang: &str) -> Option<&ArticleMetadata> {
        self.metadata.get(lang)
    }

    pub fn title_for(&self, lang: &str) -> Option<&str> {
        self.metadata_for(lang).and_then(ArticleMetadata::title)
    }

    pub fn doi(&self) -> Option<&str> {
        non_empty(self.doi.as_deref())
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
