//! CrossRef DOI registry adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::credentials::Credential;
use crate::models::{BibRecord, UNKNOWN_YEAR};
use crate::providers::{rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef DOI registry
///
/// Primary structured registry for journal-article metadata. Requires no
/// authentication; a contact address in the user agent gets the polite pool.
#[derive(Debug, Clone)]
pub struct CrossRefProvider {
    client: HttpClient,
    base_url: String,
}

impl CrossRefProvider {
    pub fn new() -> Self {
        let user_agent = format!(
            "{}/{} (mailto:crossref@crossref.org)",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        Self {
            client: HttpClient::with_user_agent(&user_agent),
            base_url: CROSSREF_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for CrossRefProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BibRecord> for CrossRefProvider {
    fn name(&self) -> &str {
        "crossref"
    }

    async fn attempt(&self, doi: &str, _credential: &Credential) -> Result<BibRecord, Rejection> {
        let url = format!("{}/works/{}", self.base_url, urlencoding::encode(doi));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("CrossRef request failed: {}", e)))?;

        if response.status().as_u16() == 404 {
            return Err(Rejection::Empty);
        }
        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let envelope: CrEnvelope = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("CrossRef JSON: {}", e)))?;

        let work = envelope.message;
        let mut record = BibRecord::unknown(doi);

        record.title = work.title.into_iter().next().unwrap_or_default();
        record.authors = work
            .author
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.display_name())
            .collect();
        record.journal = work.container_title.into_iter().next().unwrap_or_default();
        record.publisher = work.publisher.unwrap_or_default();
        record.url = work.url.unwrap_or_default();
        record.r#abstract = work.r#abstract.unwrap_or_default();
        record.entry_type = work.r#type.unwrap_or_default();
        record.volume = work.volume.unwrap_or_default();
        record.issue = work.issue.unwrap_or_default();
        record.pages = work.page.unwrap_or_default();

        if let Some(parts) = work
            .issued
            .and_then(|d| d.date_parts.into_iter().next())
        {
            let mut parts = parts.into_iter().flatten();
            record.year = parts
                .next()
                .map(|y| y.to_string())
                .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
            record.month = parts.next().map(|m| m.to_string()).unwrap_or_default();
            record.day = parts.next().map(|d| d.to_string()).unwrap_or_default();
        }

        if record.is_bare() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CrEnvelope {
    message: CrWork,
}

#[derive(Debug, Deserialize)]
struct CrWork {
    #[serde(default)]
    title: Vec<String>,
    author: Option<Vec<CrAuthor>>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    publisher: Option<String>,
    issued: Option<CrDate>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    r#abstract: Option<String>,
    r#type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrAuthor {
    given: Option<String>,
    family: Option<String>,
    name: Option<String>,
}

impl CrAuthor {
    /// "Given Family" for persons, the literal name for org authors.
    fn display_name(self) -> Option<String> {
        match (self.given, self.family) {
            (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
            (None, Some(family)) => Some(family),
            (Some(given), None) => Some(given),
            (None, None) => self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CrDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_display_name() {
        let person = CrAuthor {
            given: Some("Jane".into()),
            family: Some("Doe".into()),
            name: None,
        };
        assert_eq!(person.display_name(), Some("Jane Doe".to_string()));

        let org = CrAuthor {
            given: None,
            family: None,
            name: Some("The Royal Society".into()),
        };
        assert_eq!(org.display_name(), Some("The Royal Society".to_string()));
    }
}
