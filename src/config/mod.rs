//! Configuration management.
//!
//! Credentials are read once at process start, either from a config file or
//! from the environment, and handed to the resolver as explicit pools. No
//! adapter reads the environment on its own.
//!
//! Environment variables:
//!
//! - `GEMINI_API_KEYS` - comma-separated pool of Gemini keys
//! - `GOOGLE_BOOKS_API_KEYS` - comma-separated pool of Google Books keys
//! - `MISTRAL_API_KEY` - single fixed Mistral fallback key
//! - `COHERE_API_KEY` - single fixed Cohere fallback key

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API keys for external providers
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Summarization settings
    #[serde(default)]
    pub summarize: SummarizeConfig,

    /// Summary cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// API keys for external providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Pooled Gemini keys, rotated per call
    #[serde(default)]
    pub gemini: Vec<String>,

    /// Pooled Google Books keys (optional, the API also works keyless)
    #[serde(default)]
    pub google_books: Vec<String>,

    /// Fixed Mistral fallback key
    #[serde(default)]
    pub mistral: Option<String>,

    /// Fixed Cohere fallback key
    #[serde(default)]
    pub cohere: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            gemini: split_keys("GEMINI_API_KEYS"),
            google_books: split_keys("GOOGLE_BOOKS_API_KEYS"),
            mistral: non_empty_var("MISTRAL_API_KEY"),
            cohere: non_empty_var("COHERE_API_KEY"),
        }
    }
}

/// Summarization acceptance settings.
///
/// When both bounds are set, a summary is accepted only if its word count
/// falls inside the band; by default only non-emptiness is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Minimum accepted word count
    #[serde(default)]
    pub min_words: Option<usize>,

    /// Maximum accepted word count
    #[serde(default)]
    pub max_words: Option<usize>,
}

impl SummarizeConfig {
    /// The configured word-count band, if both bounds are present.
    pub fn word_band(&self) -> Option<(usize, usize)> {
        match (self.min_words, self.max_words) {
            (Some(min), Some(max)) if min <= max => Some((min, max)),
            _ => None,
        }
    }
}

/// Summary cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Time-to-live for cached summaries, in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    3600
}

fn non_empty_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_keys(var: &str) -> Vec<String> {
    std::env::var(var)
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Load configuration from a file, layered with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("REFSOLVE"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}
