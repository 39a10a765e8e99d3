//! Gap-filling merge of partial records.
//!
//! Enrichment is additive, never corrective: a field is patched only when
//! the base value is the capability's unknown sentinel and the enrichment
//! value is not. List fields (authors) are replaced wholesale, never
//! element-merged, and only when the base list is empty or all placeholders.

use crate::models::{is_placeholder_author, BibRecord, BookRecord, Summary, UNKNOWN_YEAR};

/// Record types that support gap detection and gap-filling merges.
pub trait Mergeable: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Whether any field still holds the unknown sentinel.
    fn has_gaps(&self) -> bool;

    /// Fill sentinel fields from `other`, returning the names of the fields
    /// that were patched. Fields already holding real data are untouched.
    fn fill_gaps_from(&mut self, other: &Self) -> Vec<&'static str>;

    /// Whether a quality-rejected record still carries enough data to serve
    /// as a merge base when the chain is exhausted.
    fn is_usable_partial(&self) -> bool;
}

fn year_missing(year: &str) -> bool {
    year.is_empty() || year == UNKNOWN_YEAR
}

fn patch_string(
    field: &mut String,
    from: &str,
    name: &'static str,
    missing: fn(&str) -> bool,
    patched: &mut Vec<&'static str>,
) {
    if missing(field) && !missing(from) {
        *field = from.to_string();
        patched.push(name);
    }
}

fn string_missing(value: &str) -> bool {
    value.is_empty()
}

/// Whether an author list carries no real names.
fn authors_missing(authors: &[String]) -> bool {
    authors.is_empty() || authors.iter().all(|a| is_placeholder_author(a))
}

/// Whether an author list is usable as a wholesale replacement.
fn authors_replaceable(authors: &[String]) -> bool {
    !authors.is_empty() && authors.iter().all(|a| !is_placeholder_author(a))
}

fn patch_authors(
    base: &mut Vec<String>,
    from: &[String],
    patched: &mut Vec<&'static str>,
) {
    if authors_missing(base) && authors_replaceable(from) {
        *base = from.to_vec();
        patched.push("authors");
    }
}

impl Mergeable for BibRecord {
    fn has_gaps(&self) -> bool {
        self.title.is_empty()
            || authors_missing(&self.authors)
            || self.journal.is_empty()
            || self.publisher.is_empty()
            || year_missing(&self.year)
            || self.volume.is_empty()
            || self.issue.is_empty()
            || self.pages.is_empty()
            || self.url.is_empty()
    }

    fn fill_gaps_from(&mut self, other: &Self) -> Vec<&'static str> {
        let mut patched = Vec::new();

        patch_string(&mut self.title, &other.title, "title", string_missing, &mut patched);
        patch_authors(&mut self.authors, &other.authors, &mut patched);
        patch_string(&mut self.journal, &other.journal, "journal", string_missing, &mut patched);
        patch_string(&mut self.publisher, &other.publisher, "publisher", string_missing, &mut patched);
        patch_string(&mut self.year, &other.year, "year", year_missing, &mut patched);
        patch_string(&mut self.month, &other.month, "month", string_missing, &mut patched);
        patch_string(&mut self.day, &other.day, "day", string_missing, &mut patched);
        patch_string(&mut self.volume, &other.volume, "volume", string_missing, &mut patched);
        patch_string(&mut self.issue, &other.issue, "issue", string_missing, &mut patched);
        patch_string(&mut self.pages, &other.pages, "pages", string_missing, &mut patched);
        patch_string(&mut self.url, &other.url, "url", string_missing, &mut patched);
        patch_string(&mut self.r#abstract, &other.r#abstract, "abstract", string_missing, &mut patched);
        patch_string(&mut self.entry_type, &other.entry_type, "entryType", string_missing, &mut patched);

        patched
    }

    fn is_usable_partial(&self) -> bool {
        !self.is_bare()
    }
}

impl Mergeable for BookRecord {
    fn has_gaps(&self) -> bool {
        self.title.is_empty()
            || authors_missing(&self.authors)
            || self.publisher.is_empty()
            || year_missing(&self.year)
            || self.place.is_empty()
            || self.page_count == 0
            || self.cover_url.is_empty()
    }

    fn fill_gaps_from(&mut self, other: &Self) -> Vec<&'static str> {
        let mut patched = Vec::new();

        patch_string(&mut self.title, &other.title, "title", string_missing, &mut patched);
        patch_authors(&mut self.authors, &other.authors, &mut patched);
        patch_string(&mut self.publisher, &other.publisher, "publisher", string_missing, &mut patched);
        patch_string(&mut self.year, &other.year, "year", year_missing, &mut patched);
        patch_string(&mut self.place, &other.place, "place", string_missing, &mut patched);
        patch_string(&mut self.cover_url, &other.cover_url, "coverUrl", string_missing, &mut patched);

        if self.page_count == 0 && other.page_count != 0 {
            self.page_count = other.page_count;
            patched.push("pageCount");
        }

        patched
    }

    fn is_usable_partial(&self) -> bool {
        !self.title.is_empty() || !self.authors.is_empty()
    }
}

// A summary is a single scalar field: nothing to merge, and a rejected
// summary is never worth returning on exhaustion.
impl Mergeable for Summary {
    fn has_gaps(&self) -> bool {
        false
    }

    fn fill_gaps_from(&mut self, _other: &Self) -> Vec<&'static str> {
        Vec::new()
    }

    fn is_usable_partial(&self) -> bool {
        false
    }
}
