//! Gemini generative provider adapters.
//!
//! Gemini plays three roles: primary summarizer, last-resort citation
//! estimator for DOIs nothing else resolves, and the designated enrichment
//! provider for ISBN gaps. All three share one thin client; the structured
//! roles prompt for strict JSON and treat anything unparseable as a parse
//! rejection. AI answers carry no verifiable provenance, which is why the
//! estimator sits last in the DOI chain.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::credentials::Credential;
use crate::models::{BibRecord, BookRecord, Summary, UNKNOWN_YEAR};
use crate::providers::{
    extract_json_object, rejection_from_response, ProviderAdapter, Rejection,
};
use crate::utils::HttpClient;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
struct GeminiClient {
    client: HttpClient,
    base_url: String,
}

impl GeminiClient {
    fn new() -> Self {
        Self {
            client: HttpClient::for_generation(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    fn with_base_url(base_url: String) -> Self {
        Self {
            client: HttpClient::for_generation(),
            base_url,
        }
    }

    async fn generate(&self, prompt: &str, credential: &Credential) -> Result<String, Rejection> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            GEMINI_MODEL,
            urlencoding::encode(&credential.secret)
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("Gemini JSON: {}", e)))?;

        let text = data
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(text)
    }
}

/// Gemini as the primary summarization provider.
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    inner: GeminiClient,
}

impl GeminiSummarizer {
    pub fn new() -> Self {
        Self {
            inner: GeminiClient::new(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            inner: GeminiClient::with_base_url(base_url.into()),
        }
    }
}

impl Default for GeminiSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<Summary> for GeminiSummarizer {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn attempt(&self, text: &str, credential: &Credential) -> Result<Summary, Rejection> {
        let prompt = format!(
            "Summarize the following text in a few clear sentences. \
             Respond with the summary only, no preamble.\n\n{}",
            text
        );
        let output = self.inner.generate(&prompt, credential).await?;
        Ok(Summary::new(output.trim()))
    }
}

/// Gemini as the last-resort DOI citation estimator.
#[derive(Debug, Clone)]
pub struct GeminiCitationEstimator {
    inner: GeminiClient,
}

impl GeminiCitationEstimator {
    pub fn new() -> Self {
        Self {
            inner: GeminiClient::new(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            inner: GeminiClient::with_base_url(base_url.into()),
        }
    }
}

impl Default for GeminiCitationEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BibRecord> for GeminiCitationEstimator {
    fn name(&self) -> &str {
        "gemini-citation"
    }

    async fn attempt(&self, doi: &str, credential: &Credential) -> Result<BibRecord, Rejection> {
        let prompt = format!(
            "You are a bibliographic assistant. Provide the citation metadata \
             for DOI {} as a single JSON object with string fields: title, \
             journal, publisher, year, volume, issue, pages, url, and an \
             \"authors\" array of full names. Use \"\" for anything you do \
             not know and \"n.d.\" for an unknown year. Respond with JSON \
             only.",
            doi
        );
        let output = self.inner.generate(&prompt, credential).await?;
        let estimated: EstimatedCitation = parse_estimate(&output)?;

        let mut record = BibRecord::unknown(doi);
        record.title = estimated.title.unwrap_or_default();
        record.authors = estimated
            .authors
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect();
        record.journal = estimated.journal.unwrap_or_default();
        record.publisher = estimated.publisher.unwrap_or_default();
        record.year = estimated
            .year
            .filter(|y| !y.is_empty())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        record.volume = estimated.volume.unwrap_or_default();
        record.issue = estimated.issue.unwrap_or_default();
        record.pages = estimated.pages.unwrap_or_default();
        record.url = estimated.url.unwrap_or_default();

        if record.is_bare() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

/// Gemini as the designated enrichment provider for ISBN gaps.
#[derive(Debug, Clone)]
pub struct GeminiBookEstimator {
    inner: GeminiClient,
}

impl GeminiBookEstimator {
    pub fn new() -> Self {
        Self {
            inner: GeminiClient::new(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            inner: GeminiClient::with_base_url(base_url.into()),
        }
    }
}

impl Default for GeminiBookEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BookRecord> for GeminiBookEstimator {
    fn name(&self) -> &str {
        "gemini-book"
    }

    async fn attempt(&self, isbn: &str, credential: &Credential) -> Result<BookRecord, Rejection> {
        let prompt = format!(
            "You are a bibliographic assistant. Provide the book metadata for \
             ISBN {} as a single JSON object with string fields: title, \
             publisher, year, place, plus an \"authors\" array of full names \
             and a numeric \"pageCount\". Use \"\" for anything you do not \
             know, \"n.d.\" for an unknown year and 0 for an unknown page \
             count. Respond with JSON only.",
            isbn
        );
        let output = self.inner.generate(&prompt, credential).await?;
        let estimated: EstimatedBook = parse_estimate(&output)?;

        let mut record = BookRecord::unknown(isbn);
        record.title = estimated.title.unwrap_or_default();
        record.authors = estimated
            .authors
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect();
        record.publisher = estimated.publisher.unwrap_or_default();
        record.year = estimated
            .year
            .filter(|y| !y.is_empty())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        record.place = estimated.place.unwrap_or_default();
        record.page_count = estimated.page_count.unwrap_or(0);

        if record.title.is_empty() && record.authors.is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

/// Strip fences/prose around the generated JSON and deserialize it.
fn parse_estimate<T: serde::de::DeserializeOwned>(output: &str) -> Result<T, Rejection> {
    let json = extract_json_object(output)
        .ok_or_else(|| Rejection::Parse("no JSON object in generated output".to_string()))?;
    serde_json::from_str(json).map_err(|e| Rejection::Parse(format!("generated JSON: {}", e)))
}

// ===== Gemini API Types =====

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EstimatedCitation {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    journal: Option<String>,
    publisher: Option<String>,
    year: Option<String>,
    volume: Option<String>,
    issue: Option<String>,
    pages: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimatedBook {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    year: Option<String>,
    place: Option<String>,
    page_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_estimate_with_fences() {
        let output = "Here you go:\n```json\n{\"title\": \"Clean Code\", \
                      \"authors\": [\"Robert C. Martin\"]}\n```";
        let estimated: EstimatedCitation = parse_estimate(output).unwrap();
        assert_eq!(estimated.title.as_deref(), Some("Clean Code"));
        assert_eq!(estimated.authors, vec!["Robert C. Martin".to_string()]);
    }

    #[test]
    fn test_parse_estimate_rejects_prose() {
        let result: Result<EstimatedCitation, _> = parse_estimate("I cannot help with that.");
        assert!(matches!(result, Err(Rejection::Parse(_))));
    }
}
