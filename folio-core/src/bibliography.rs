//! BibTeX database generation from article references.

use crate::models::ReferenceEntry;
use hayagriva::io::from_biblatex_str;
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BibliographyError {
    #[error("Generated bibliography does not parse: {0}")]
    Unparseable(String),
}

/// One `@article` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub key: String,
    pub note: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
}

impl BibEntry {
    /// Build an entry from the reference at `index` (zero-based) in its list.
    ///
    /// Missing or blank ids fall back to `ref<index + 1>`.
    pub fn from_reference(index: usize, reference: &ReferenceEntry) -> Self {
        let key = reference
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("ref{}", index + 1));

        Self {
            key,
            note: reference
                .text
                .first()
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string),
            doi: reference.doi().map(str::to_string),
            url: reference.url().map(str::to_string),
        }
    }

    fn write_bibtex(&self, out: &mut String) {
        let _ = writeln!(out, "@article{{{},", self.key);
        if let Some(note) = &self.note {
            let _ = writeln!(out, "  note = {{{}}},", note);
        }
        if let Some(doi) = &self.doi {
            let _ = writeln!(out, "  doi = {{{}}},", doi);
        }
        if let Some(url) = &self.url {
            let _ = writeln!(out, "  url = {{{}}},", url);
        }
        out.push_str("}\n\n");
    }
}

/// Ordered list of entries for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    entries: Vec<BibEntry>,
}

impl Bibliography {
    pub fn from_references(references: &[ReferenceEntry]) -> Self {
        Self {
            entries: references
                .iter()
                .enumerate()
                .map(|(i, r)| BibEntry::from_reference(i, r))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[BibEntry] {
        &self.entries
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the whole database, one block per entry in input order.
    pub fn to_bibtex(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            entry.write_bibtex(&mut out);
        }
        out
    }

    /// Parse the rendered database back as BibLaTeX and return the entry count.
    ///
    /// Reference text is free-form, so unbalanced braces in a note can
    /// produce a file the converter will reject.
    pub fn validate(&self) -> Result<usize, BibliographyError> {
        match from_biblatex_str(&self.to_bibtex()) {
            Ok(library) => Ok(library.len()),
            Err(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(BibliographyError::Unparseable(joined))
            }
        }
    }
}

/// Render `references` as a BibTeX database.
pub fn build(references: &[ReferenceEntry]) -> String {
    Bibliography::from_references(references).to_bibtex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocalizedText;

    fn reference(id: Option<&str>, text: &[(&str, &str)]) -> ReferenceEntry {
        ReferenceEntry {
            id: id.map(str::to_string),
            text: text.iter().copied().collect(),
            doi: None,
            url: None,
        }
    }

    #[test]
    fn test_fallback_keys_use_one_based_position() {
        let refs = vec![
            reference(None, &[("en", "A")]),
            reference(Some("r2"), &[("ru", "B")]),
            reference(Some("   "), &[("en", "C")]),
        ];
        let bib = Bibliography::from_references(&refs);
        let keys: Vec<&str> = bib.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["ref1", "r2", "ref3"]);
    }

    #[test]
    fn test_note_uses_first_language_encountered() {
        let refs = vec![reference(Some("k"), &[("ru", "Первый"), ("en", "First")])];
        let bib = Bibliography::from_references(&refs);
        assert_eq!(bib.entries()[0].note.as_deref(), Some("Первый"));
    }

    #[test]
    fn test_bibtex_layout() {
        let refs = vec![
            ReferenceEntry {
                id: Some("knuth84".into()),
                text: LocalizedText::from_iter([("en", "Knuth, The TeXbook")]),
                doi: Some("10.1000/tex".into()),
                url: Some("https://example.org/tex".into()),
            },
            reference(None, &[]),
        ];

        insta::assert_snapshot!(build(&refs), @r"
        @article{knuth84,
          note = {Knuth, The TeXbook},
          doi = {10.1000/tex},
          url = {https://example.org/tex},
        }

        @article{ref2,
        }
        ");
    }

    #[test]
    fn test_empty_references_give_empty_database() {
        let bib = Bibliography::from_references(&[]);
        assert!(bib.is_empty());
        assert_eq!(bib.to_bibtex(), "");
    }

    #[test]
    fn test_generated_database_parses() {
        let refs = vec![
            reference(None, &[("en", "A")]),
            ReferenceEntry {
                id: Some("r2".into()),
                text: LocalizedText::from_iter([("ru", "B")]),
                doi: Some("10.1/b".into()),
                url: None,
            },
        ];
        let bib = Bibliography::from_references(&refs);
        assert_eq!(bib.validate().unwrap(), 2);

        let library = from_biblatex_str(&bib.to_bibtex()).unwrap();
        assert!(library.get("ref1").is_some());
        assert!(library.get("r2").is_some());
    }
}
