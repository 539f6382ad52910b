//! Record extraction from raw bibliography text.
//!
//! This is pattern matching over the usual BibTeX record shape, not a BibTeX
//! parser. Citation keys and `author` field bodies are collected independently
//! and paired by position, so a record without an `author` field shifts every
//! following pairing. A count mismatch is reported through
//! [`Extraction::mismatch`] but never changes the pairing.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::name::normalize_name;

/// Body of an `author = { ... }` field, up to the first closing brace.
static AUTHOR_FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\bauthor\s*=\s*\{(.*?)\}").unwrap());

/// Citation key from a record header, e.g. `@article{smith2020,`.
static CITATION_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+\{(.*?),").unwrap());

/// Separator between authors in an `author` field.
pub const AUTHOR_SEPARATOR: &str = " and";

/// A citation key paired with the raw body of its `author` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub citation_key: String,
    pub author_field: String,
}

impl RawRecord {
    /// Raw author names, split on the literal `" and"` token.
    pub fn authors(&self) -> Vec<&str> {
        self.author_field.split(AUTHOR_SEPARATOR).collect()
    }

    /// First and last raw author names. Identical for single-author records.
    pub fn first_and_last(&self) -> (&str, &str) {
        let authors = self.authors();
        let first = authors.first().copied().unwrap_or("");
        let last = authors.last().copied().unwrap_or(first);
        (first, last)
    }

    /// Normalize the first and last author names into a [`BibRecord`].
    pub fn to_bib_record(&self) -> BibRecord {
        let (first, last) = self.first_and_last();
        BibRecord {
            citation_key: self.citation_key.clone(),
            first_author: normalize_name(first),
            last_author: normalize_name(last),
        }
    }
}

/// A record reduced to what gender resolution needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibRecord {
    pub citation_key: String,
    pub first_author: String,
    pub last_author: String,
}

/// Header and author field counts that did not line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMismatch {
    pub headers: usize,
    pub authors: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(
        "found {headers} record header(s) but {authors} author field(s); records cannot be paired reliably"
    )]
    CountMismatch { headers: usize, authors: usize },
}

/// Result of scanning a bibliography.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<RawRecord>,
    pub header_count: usize,
    pub author_field_count: usize,
}

impl Extraction {
    pub fn mismatch(&self) -> Option<CountMismatch> {
        (self.header_count != self.author_field_count).then_some(CountMismatch {
            headers: self.header_count,
            authors: self.author_field_count,
        })
    }

    /// Fail if headers and author fields could not be paired one to one.
    pub fn ensure_aligned(&self) -> Result<(), ExtractError> {
        match self.mismatch() {
            Some(CountMismatch { headers, authors }) => {
                Err(ExtractError::CountMismatch { headers, authors })
            }
            None => Ok(()),
        }
    }

    pub fn bib_records(&self) -> Vec<BibRecord> {
        self.records.iter().map(RawRecord::to_bib_record).collect()
    }
}

/// Extract citation keys and author fields from bibliography text.
///
/// Line breaks inside author fields are replaced by spaces. Pairing stops at
/// the shorter of the two sequences.
pub fn extract_records(text: &str) -> Extraction {
    let author_fields: Vec<String> = AUTHOR_FIELD_REGEX
        .captures_iter(text)
        .map(|caps| caps[1].replace('\n', " "))
        .collect();

    let citation_keys: Vec<String> = CITATION_KEY_REGEX
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    let extraction = Extraction {
        header_count: citation_keys.len(),
        author_field_count: author_fields.len(),
        records: citation_keys
            .into_iter()
            .zip(author_fields)
            .map(|(citation_key, author_field)| RawRecord {
                citation_key,
                author_field,
            })
            .collect(),
    };

    if let Some(mismatch) = extraction.mismatch() {
        warn!(
            headers = mismatch.headers,
            authors = mismatch.authors,
            "record header and author field counts differ; pairing by position"
        );
    }

    extraction
}
