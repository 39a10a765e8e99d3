//! Cohere summarization fallback adapter.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::credentials::Credential;
use crate::models::Summary;
use crate::providers::{rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const COHERE_API_BASE: &str = "https://api.cohere.ai";
const COHERE_MODEL: &str = "command-r";

/// Cohere chat API
///
/// Second summarization fallback; single fixed credential, same rationale
/// as Mistral.
#[derive(Debug, Clone)]
pub struct CohereProvider {
    client: HttpClient,
    base_url: String,
}

impl CohereProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::for_generation(),
            base_url: COHERE_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::for_generation(),
            base_url: base_url.into(),
        }
    }
}

impl Default for CohereProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<Summary> for CohereProvider {
    fn name(&self) -> &str {
        "cohere"
    }

    async fn attempt(&self, text: &str, credential: &Credential) -> Result<Summary, Rejection> {
        let url = format!("{}/v1/chat", self.base_url);
        let body = json!({
            "model": COHERE_MODEL,
            "message": format!(
                "Summarize the following text in a few clear sentences. \
                 Respond with the summary only.\n\n{}",
                text
            ),
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credential.secret)
            .json(&body)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("Cohere request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let data: CohereResponse = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("Cohere JSON: {}", e)))?;

        let content = data.text.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(Summary::new(content.trim()))
    }
}

// ===== Cohere API Types =====

#[derive(Debug, Deserialize)]
struct CohereResponse {
    text: Option<String>,
}
