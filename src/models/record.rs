//! Normalized record shapes produced by provider adapters.
//!
//! Every capability has its own record type with explicit "unknown" sentinels
//! (empty string, [`UNKNOWN_YEAR`], empty author list). The merge step relies
//! on the distinction between a sentinel and a genuinely present value, so
//! adapters must default absent fields to the sentinels rather than inventing
//! placeholder text.

use serde::{Deserialize, Serialize};

/// Sentinel for an unknown string-valued field.
pub const UNKNOWN: &str = "";

/// Sentinel for an unknown publication year ("no date").
pub const UNKNOWN_YEAR: &str = "n.d.";

/// Whether an author name is a placeholder rather than a real person.
///
/// Some registries return literal "Unknown" / "Unknown Author" entries when
/// they have no author data; those must not block enrichment from a better
/// source.
pub fn is_placeholder_author(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed.contains("Unknown")
}

/// A bibliographic record for a journal article or similar work.
///
/// This struct provides a standardized format across all registries, so the
/// resolver can treat every provider's response identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibRecord {
    /// Work title
    pub title: String,

    /// Author names in citation order
    pub authors: Vec<String>,

    /// Journal or container title
    pub journal: String,

    /// Publisher name
    pub publisher: String,

    /// Publication year ([`UNKNOWN_YEAR`] when not dated)
    pub year: String,

    /// Publication month (numeric string)
    pub month: String,

    /// Publication day (numeric string)
    pub day: String,

    /// Volume number
    pub volume: String,

    /// Issue number
    pub issue: String,

    /// Page range (e.g. "42-58")
    pub pages: String,

    /// The identifier that was resolved (DOI)
    pub identifier: String,

    /// Landing page URL
    pub url: String,

    /// Abstract text
    pub r#abstract: String,

    /// Entry type (e.g. "journal-article", "book-chapter")
    pub entry_type: String,
}

impl BibRecord {
    /// Create a record where every field except the identifier is unknown.
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self {
            title: UNKNOWN.to_string(),
            authors: Vec::new(),
            journal: UNKNOWN.to_string(),
            publisher: UNKNOWN.to_string(),
            year: UNKNOWN_YEAR.to_string(),
            month: UNKNOWN.to_string(),
            day: UNKNOWN.to_string(),
            volume: UNKNOWN.to_string(),
            issue: UNKNOWN.to_string(),
            pages: UNKNOWN.to_string(),
            identifier: identifier.into(),
            url: UNKNOWN.to_string(),
            r#abstract: UNKNOWN.to_string(),
            entry_type: UNKNOWN.to_string(),
        }
    }

    /// Whether at least one author is a real name rather than a placeholder.
    pub fn has_real_authors(&self) -> bool {
        self.authors.iter().any(|a| !is_placeholder_author(a))
    }

    /// Whether the record carries any usable data beyond the identifier.
    pub fn is_bare(&self) -> bool {
        self.title.is_empty() && self.authors.is_empty()
    }
}

/// A book record resolved from an ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Book title
    pub title: String,

    /// Author names
    pub authors: Vec<String>,

    /// Publisher name
    pub publisher: String,

    /// Publication year ([`UNKNOWN_YEAR`] when not dated)
    pub year: String,

    /// Place of publication
    pub place: String,

    /// Number of pages (0 when unknown)
    pub page_count: u32,

    /// The identifier that was resolved (ISBN)
    pub identifier: String,

    /// Cover image URL
    pub cover_url: String,
}

impl BookRecord {
    /// Create a record where every field except the identifier is unknown.
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self {
            title: UNKNOWN.to_string(),
            authors: Vec::new(),
            publisher: UNKNOWN.to_string(),
            year: UNKNOWN_YEAR.to_string(),
            place: UNKNOWN.to_string(),
            page_count: 0,
            identifier: identifier.into(),
            cover_url: UNKNOWN.to_string(),
        }
    }

    /// Whether at least one author is a real name rather than a placeholder.
    pub fn has_real_authors(&self) -> bool {
        self.authors.iter().any(|a| !is_placeholder_author(a))
    }
}

/// The output of a text-generation capability: a single scalar string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary(pub String);

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bib_record_sentinels() {
        let record = BibRecord::unknown("10.1000/xyz");

        assert_eq!(record.identifier, "10.1000/xyz");
        assert_eq!(record.year, UNKNOWN_YEAR);
        assert_eq!(record.title, UNKNOWN);
        assert!(record.authors.is_empty());
        assert!(record.is_bare());
    }

    #[test]
    fn test_placeholder_author_detection() {
        assert!(is_placeholder_author("Unknown"));
        assert!(is_placeholder_author("Unknown Author"));
        assert!(is_placeholder_author("  "));
        assert!(!is_placeholder_author("Robert C. Martin"));
    }

    #[test]
    fn test_has_real_authors() {
        let mut record = BibRecord::unknown("10.1000/xyz");
        assert!(!record.has_real_authors());

        record.authors = vec!["Unknown Author".to_string()];
        assert!(!record.has_real_authors());

        record.authors = vec!["Unknown Author".to_string(), "Jane Doe".to_string()];
        assert!(record.has_real_authors());
    }

    #[test]
    fn test_bib_record_serializes_camel_case() {
        let record = BibRecord::unknown("10.1000/xyz");
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("entryType").is_some());
        assert!(json.get("entry_type").is_none());
    }
}
