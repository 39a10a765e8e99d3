//! Quality predicates: the single place that encodes "good enough".
//!
//! A predicate judges only the current record; it never inspects attempt
//! history. Predicates are swappable per capability, replacing the inline
//! "is this result usable" conditionals that otherwise accrete in every
//! handler.

use crate::models::{BibRecord, BookRecord, Summary};

/// Accept/reject rule applied to a single provider's normalized record.
pub type QualityPredicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// Bibliographic lookup: accept when at least one real author is present.
/// Titles alone are not enough; a record without authors cannot be cited.
pub fn bibliographic() -> QualityPredicate<BibRecord> {
    Box::new(|record| record.has_real_authors())
}

/// Book lookup: accept when both a title and an author list are present.
pub fn book() -> QualityPredicate<BookRecord> {
    Box::new(|record| !record.title.is_empty() && record.has_real_authors())
}

/// Summarization: accept non-empty output, optionally constrained to a
/// word-count band when one is configured.
pub fn summary(word_band: Option<(usize, usize)>) -> QualityPredicate<Summary> {
    Box::new(move |summary| {
        let text = summary.as_str().trim();
        if text.is_empty() {
            return false;
        }
        match word_band {
            Some((min, max)) => {
                let words = text.split_whitespace().count();
                words >= min && words <= max
            }
            None => true,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bibliographic_requires_real_authors() {
        let predicate = bibliographic();

        let mut record = BibRecord::unknown("10.1000/x");
        record.title = "A Title".to_string();
        assert!(!predicate(&record));

        record.authors = vec!["Unknown".to_string()];
        assert!(!predicate(&record));

        record.authors = vec!["Jane Doe".to_string()];
        assert!(predicate(&record));
    }

    #[test]
    fn test_book_requires_title_and_authors() {
        let predicate = book();

        let mut record = BookRecord::unknown("9780132350884");
        assert!(!predicate(&record));

        record.title = "Clean Code".to_string();
        assert!(!predicate(&record));

        record.authors = vec!["Robert C. Martin".to_string()];
        assert!(predicate(&record));
    }

    #[test]
    fn test_summary_non_empty() {
        let predicate = summary(None);

        assert!(!predicate(&Summary::new("")));
        assert!(!predicate(&Summary::new("   \n")));
        assert!(predicate(&Summary::new("A concise summary.")));
    }

    #[test]
    fn test_summary_word_band() {
        let predicate = summary(Some((3, 5)));

        assert!(!predicate(&Summary::new("too short")));
        assert!(predicate(&Summary::new("just about right here")));
        assert!(!predicate(&Summary::new("this one runs on far too long to fit")));
    }
}
