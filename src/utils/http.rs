//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Per-attempt ceiling for metadata registry lookups.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-attempt ceiling for generative-text calls, which run longer.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client with a fixed per-request timeout.
///
/// Exceeding the timeout surfaces as a plain transport error, which the
/// resolver treats identically to any other network failure.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a client for metadata lookups with the default user agent.
    pub fn new() -> Self {
        Self::with_timeout(METADATA_TIMEOUT)
    }

    /// Create a client for generative providers (longer timeout).
    pub fn for_generation() -> Self {
        Self::with_timeout(GENERATION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            timeout,
        )
    }

    /// Create a client with a custom user agent (some registries ask for a
    /// contact address in it).
    pub fn with_user_agent(user_agent: &str) -> Self {
        Self::build(user_agent, METADATA_TIMEOUT)
    }

    fn build(user_agent: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Arc::new(client),
        }
    }

    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
