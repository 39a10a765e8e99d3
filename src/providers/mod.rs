//! Provider adapters with a trait-based architecture.
//!
//! This module defines the [`ProviderAdapter`] trait that every external
//! provider implements. An adapter owns its provider's request shaping and
//! response parsing, normalizing the response into the capability's record
//! shape with unknown fields defaulted to sentinels. This isolation is what
//! lets the resolver treat every provider identically.
//!
//! Adapters never panic or let a transport error escape their boundary: all
//! network, HTTP-status, and parse failures are converted into a
//! [`Rejection`] value that the resolver records and moves past.

mod cohere;
mod crossref;
mod datacite;
mod gemini;
mod google_books;
mod mistral;
mod openalex;
mod openlibrary;
mod registry;

pub mod mock;

pub use cohere::CohereProvider;
pub use crossref::CrossRefProvider;
pub use datacite::DataCiteProvider;
pub use gemini::{GeminiBookEstimator, GeminiCitationEstimator, GeminiSummarizer};
pub use google_books::GoogleBooksProvider;
pub use mistral::MistralProvider;
pub use mock::MockProvider;
pub use openalex::OpenAlexProvider;
pub use openlibrary::OpenLibraryProvider;
pub use registry::ResolverRegistry;

use async_trait::async_trait;
use serde::Serialize;

use crate::credentials::Credential;
use crate::models::AttemptStatus;

/// A category of resolution task with its own provider chain and quality rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Doi,
    Isbn,
    Summarize,
}

impl Capability {
    /// Identifier used in logs and configuration.
    pub fn id(&self) -> &'static str {
        match self {
            Capability::Doi => "doi",
            Capability::Isbn => "isbn",
            Capability::Summarize => "summarize",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// The adapter contract: one provider, one normalized record shape.
#[async_trait]
pub trait ProviderAdapter<R>: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this provider (used in attempt logs, e.g.
    /// "crossref").
    fn name(&self) -> &str;

    /// Attempt one resolution against this provider.
    ///
    /// Must never panic past this boundary; every failure mode becomes a
    /// [`Rejection`].
    async fn attempt(&self, input: &str, credential: &Credential) -> Result<R, Rejection>;
}

/// Why a provider attempt yielded no acceptable record.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// Transport-level failure (DNS, connection, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The provider responded with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body was not valid or expected JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider responded successfully but had no usable payload.
    #[error("no usable payload")]
    Empty,
}

impl Rejection {
    /// Map onto the attempt-status taxonomy.
    pub fn status(&self) -> AttemptStatus {
        match self {
            Rejection::Network(_) => AttemptStatus::NetworkError,
            Rejection::Http { .. } => AttemptStatus::HttpError,
            Rejection::Parse(_) => AttemptStatus::ParseError,
            Rejection::Empty => AttemptStatus::Empty,
        }
    }
}

impl From<reqwest::Error> for Rejection {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts are treated identically to any other transport failure.
        Rejection::Network(err.to_string())
    }
}

impl From<serde_json::Error> for Rejection {
    fn from(err: serde_json::Error) -> Self {
        Rejection::Parse(format!("JSON: {}", err))
    }
}

/// Build an HTTP rejection from a non-success response, parsing the body
/// best-effort for a provider error message and falling back to the status.
pub(crate) async fn rejection_from_response(response: reqwest::Response) -> Rejection {
    let status = response.status();
    let message = match response.text().await {
        Ok(body) => extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Rejection::Http {
        status: status.as_u16(),
        message,
    }
}

/// Pull a human-readable message out of a provider error body. Providers
/// disagree on shape; the common keys are tried in order.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .or_else(|| value.get("error"))
        .and_then(|m| m.as_str())?;
    Some(message.to_string())
}

/// Find the first plausible four-digit year in a free-form date string
/// (e.g. "March 2009", "2009-03-01").
pub(crate) fn extract_year(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut run = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            run += 1;
            if run == 4 {
                let next_is_digit = bytes.get(i + 1).is_some_and(|c| c.is_ascii_digit());
                if !next_is_digit {
                    let year = &text[i + 1 - 4..=i];
                    if year.starts_with('1') || year.starts_with('2') {
                        return Some(year.to_string());
                    }
                }
                run = 0;
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Extract the outermost JSON object from generated text, tolerating
/// markdown code fences and surrounding prose.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
