//! Google Books ISBN registry adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::credentials::Credential;
use crate::models::{BookRecord, UNKNOWN_YEAR};
use crate::providers::{extract_year, rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const GOOGLE_BOOKS_API_BASE: &str = "https://www.googleapis.com";

/// Google Books volumes API
///
/// Secondary ISBN registry. Works keyless at a lower quota; an API key from
/// the pool is attached when one is configured.
#[derive(Debug, Clone)]
pub struct GoogleBooksProvider {
    client: HttpClient,
    base_url: String,
}

impl GoogleBooksProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: GOOGLE_BOOKS_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GoogleBooksProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BookRecord> for GoogleBooksProvider {
    fn name(&self) -> &str {
        "google-books"
    }

    async fn attempt(&self, isbn: &str, credential: &Credential) -> Result<BookRecord, Rejection> {
        let mut url = format!(
            "{}/books/v1/volumes?q=isbn:{}",
            self.base_url,
            urlencoding::encode(isbn)
        );
        if !credential.is_anonymous() {
            url = format!("{}&key={}", url, urlencoding::encode(&credential.secret));
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("Google Books request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let data: GbResponse = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("Google Books JSON: {}", e)))?;

        let info = data
            .items
            .into_iter()
            .next()
            .map(|item| item.volume_info)
            .ok_or(Rejection::Empty)?;

        let mut record = BookRecord::unknown(isbn);

        record.title = info.title.unwrap_or_default();
        record.authors = info.authors;
        record.publisher = info.publisher.unwrap_or_default();
        record.year = info
            .published_date
            .as_deref()
            .and_then(extract_year)
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        record.page_count = info.page_count.unwrap_or(0);
        record.cover_url = info
            .image_links
            .and_then(|links| links.thumbnail)
            .unwrap_or_default();

        if record.title.is_empty() && record.authors.is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

// ===== Google Books API Types =====

#[derive(Debug, Deserialize)]
struct GbResponse {
    #[serde(default)]
    items: Vec<GbItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbItem {
    volume_info: GbVolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbVolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    page_count: Option<u32>,
    image_links: Option<GbImageLinks>,
}

#[derive(Debug, Deserialize)]
struct GbImageLinks {
    thumbnail: Option<String>,
}
