//! OpenAlex DOI registry adapter.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::credentials::Credential;
use crate::models::{BibRecord, UNKNOWN_YEAR};
use crate::providers::{rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// OpenAlex works index
///
/// Tertiary registry; aggregates CrossRef and others, so it sometimes fills
/// venue and page data the primaries lack. No authentication required.
#[derive(Debug, Clone)]
pub struct OpenAlexProvider {
    client: HttpClient,
    base_url: String,
}

impl OpenAlexProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: OPENALEX_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenAlexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BibRecord> for OpenAlexProvider {
    fn name(&self) -> &str {
        "openalex"
    }

    async fn attempt(&self, doi: &str, _credential: &Credential) -> Result<BibRecord, Rejection> {
        let url = format!("{}/works/doi:{}", self.base_url, urlencoding::encode(doi));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("OpenAlex request failed: {}", e)))?;

        if response.status().as_u16() == 404 {
            return Err(Rejection::Empty);
        }
        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let work: OaWork = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("OpenAlex JSON: {}", e)))?;

        let mut record = BibRecord::unknown(doi);

        record.title = work.display_name.unwrap_or_default();
        record.authors = work
            .authorships
            .into_iter()
            .filter_map(|a| a.author.and_then(|author| author.display_name))
            .collect();
        record.journal = work
            .primary_location
            .and_then(|l| l.source)
            .and_then(|s| s.display_name)
            .unwrap_or_default();
        record.year = work
            .publication_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        record.entry_type = work.r#type.unwrap_or_default();
        record.url = work.doi.unwrap_or_default();

        if let Some(date) = work.publication_date {
            let mut parts = date.split('-');
            parts.next(); // year already taken from publication_year
            record.month = parts
                .next()
                .map(|m| m.trim_start_matches('0').to_string())
                .unwrap_or_default();
            record.day = parts
                .next()
                .map(|d| d.trim_start_matches('0').to_string())
                .unwrap_or_default();
        }

        if let Some(biblio) = work.biblio {
            record.volume = biblio.volume.unwrap_or_default();
            record.issue = biblio.issue.unwrap_or_default();
            record.pages = match (biblio.first_page, biblio.last_page) {
                (Some(first), Some(last)) if first != last => format!("{}-{}", first, last),
                (Some(first), _) => first,
                _ => String::new(),
            };
        }

        if let Some(index) = work.abstract_inverted_index {
            record.r#abstract = rebuild_abstract(&index);
        }

        if record.is_bare() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

/// OpenAlex ships abstracts as an inverted index (word -> positions);
/// rebuild the plain text by position.
fn rebuild_abstract(index: &HashMap<String, Vec<usize>>) -> String {
    let mut positions: Vec<(usize, &str)> = index
        .iter()
        .flat_map(|(word, at)| at.iter().map(move |&pos| (pos, word.as_str())))
        .collect();
    positions.sort_unstable_by_key(|(pos, _)| *pos);
    positions
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}

// ===== OpenAlex API Types =====

#[derive(Debug, Deserialize)]
struct OaWork {
    display_name: Option<String>,
    #[serde(default)]
    authorships: Vec<OaAuthorship>,
    primary_location: Option<OaLocation>,
    publication_year: Option<i64>,
    publication_date: Option<String>,
    biblio: Option<OaBiblio>,
    doi: Option<String>,
    r#type: Option<String>,
    abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,
}

#[derive(Debug, Deserialize)]
struct OaAuthorship {
    author: Option<OaAuthor>,
}

#[derive(Debug, Deserialize)]
struct OaAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OaLocation {
    source: Option<OaSource>,
}

#[derive(Debug, Deserialize)]
struct OaSource {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OaBiblio {
    volume: Option<String>,
    issue: Option<String>,
    first_page: Option<String>,
    last_page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_abstract() {
        let mut index = HashMap::new();
        index.insert("results".to_string(), vec![2]);
        index.insert("We".to_string(), vec![0]);
        index.insert("present".to_string(), vec![1]);

        assert_eq!(rebuild_abstract(&index), "We present results");
    }

    #[test]
    fn test_rebuild_abstract_repeated_word() {
        let mut index = HashMap::new();
        index.insert("the".to_string(), vec![0, 2]);
        index.insert("and".to_string(), vec![1]);

        assert_eq!(rebuild_abstract(&index), "the and the");
    }
}
