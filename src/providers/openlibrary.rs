//! Open Library ISBN registry adapter.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::credentials::Credential;
use crate::models::{BookRecord, UNKNOWN_YEAR};
use crate::providers::{extract_year, rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const OPENLIBRARY_API_BASE: &str = "https://openlibrary.org";

/// Open Library books API
///
/// Primary ISBN registry. No authentication required. The books endpoint
/// keys its response map by "ISBN:<isbn>"; a missing key means the ISBN is
/// simply not in the catalog.
#[derive(Debug, Clone)]
pub struct OpenLibraryProvider {
    client: HttpClient,
    base_url: String,
}

impl OpenLibraryProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: OPENLIBRARY_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenLibraryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BookRecord> for OpenLibraryProvider {
    fn name(&self) -> &str {
        "openlibrary"
    }

    async fn attempt(&self, isbn: &str, _credential: &Credential) -> Result<BookRecord, Rejection> {
        let url = format!(
            "{}/api/books?bibkeys=ISBN:{}&format=json&jscmd=data",
            self.base_url,
            urlencoding::encode(isbn)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("Open Library request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let mut books: HashMap<String, OlBook> = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("Open Library JSON: {}", e)))?;

        let book = books
            .remove(&format!("ISBN:{}", isbn))
            .ok_or(Rejection::Empty)?;

        let mut record = BookRecord::unknown(isbn);

        record.title = book.title.unwrap_or_default();
        record.authors = book
            .authors
            .into_iter()
            .filter_map(|a| a.name)
            .collect();
        record.publisher = book
            .publishers
            .into_iter()
            .filter_map(|p| p.name)
            .next()
            .unwrap_or_default();
        record.place = book
            .publish_places
            .into_iter()
            .filter_map(|p| p.name)
            .next()
            .unwrap_or_default();
        record.year = book
            .publish_date
            .as_deref()
            .and_then(extract_year)
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        record.page_count = book.number_of_pages.unwrap_or(0);
        record.cover_url = book
            .cover
            .and_then(|c| c.large.or(c.medium))
            .unwrap_or_default();

        if record.title.is_empty() && record.authors.is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

// ===== Open Library API Types =====

#[derive(Debug, Deserialize)]
struct OlBook {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<OlNamed>,
    #[serde(default)]
    publishers: Vec<OlNamed>,
    #[serde(default)]
    publish_places: Vec<OlNamed>,
    publish_date: Option<String>,
    number_of_pages: Option<u32>,
    cover: Option<OlCover>,
}

#[derive(Debug, Deserialize)]
struct OlNamed {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OlCover {
    medium: Option<String>,
    large: Option<String>,
}
