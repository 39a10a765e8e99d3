//! Mistral summarization fallback adapter.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::credentials::Credential;
use crate::models::Summary;
use crate::providers::{rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const MISTRAL_API_BASE: &str = "https://api.mistral.ai";
const MISTRAL_MODEL: &str = "mistral-small-latest";

/// Mistral chat completions
///
/// First summarization fallback; used only when the primary is down, so it
/// runs on a single fixed credential rather than a rotation pool.
#[derive(Debug, Clone)]
pub struct MistralProvider {
    client: HttpClient,
    base_url: String,
}

impl MistralProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::for_generation(),
            base_url: MISTRAL_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::for_generation(),
            base_url: base_url.into(),
        }
    }
}

impl Default for MistralProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<Summary> for MistralProvider {
    fn name(&self) -> &str {
        "mistral"
    }

    async fn attempt(&self, text: &str, credential: &Credential) -> Result<Summary, Rejection> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": MISTRAL_MODEL,
            "messages": [{
                "role": "user",
                "content": format!(
                    "Summarize the following text in a few clear sentences. \
                     Respond with the summary only.\n\n{}",
                    text
                ),
            }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credential.secret)
            .json(&body)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("Mistral request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let data: MistralResponse = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("Mistral JSON: {}", e)))?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(Rejection::Empty);
        }
        Ok(Summary::new(content.trim()))
    }
}

// ===== Mistral API Types =====

#[derive(Debug, Deserialize)]
struct MistralResponse {
    #[serde(default)]
    choices: Vec<MistralChoice>,
}

#[derive(Debug, Deserialize)]
struct MistralChoice {
    message: MistralMessage,
}

#[derive(Debug, Deserialize)]
struct MistralMessage {
    content: Option<String>,
}
