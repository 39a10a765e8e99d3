//! In-memory TTL caching for generated summaries.
//!
//! Resolution reports are request-scoped and never persisted, but the
//! summarization capability is both slow and metered, so identical input
//! text within the TTL is answered from memory without recording a single
//! provider attempt.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;

/// Result of a cache lookup
#[derive(Debug)]
pub enum CacheResult<T> {
    /// Item was found and is valid
    Hit(T),

    /// Item was not found
    Miss,

    /// Item was found but has expired
    Expired,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    cached_at: Instant,
    value: String,
}

/// TTL cache for summarization outputs, keyed by a digest of the input text.
#[derive(Debug)]
pub struct SummaryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    enabled: bool,
}

impl SummaryCache {
    /// Create a cache with the given TTL in seconds.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            enabled: true,
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        let mut cache = Self::new(config.ttl_secs);
        cache.enabled = config.enabled;
        cache
    }

    /// A cache that never hits.
    pub fn disabled() -> Self {
        let mut cache = Self::new(0);
        cache.enabled = false;
        cache
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn key(input: &str) -> String {
        let digest = md5::compute(input.as_bytes());
        format!("{:x}", digest)
    }

    /// Look up a cached summary for the given input text.
    pub fn get(&self, input: &str) -> CacheResult<String> {
        if !self.enabled {
            return CacheResult::Miss;
        }

        let key = Self::key(input);
        let mut entries = self.entries.lock().expect("summary cache mutex poisoned");

        match entries.get(&key) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => {
                tracing::debug!(key = %key, "cache HIT for summary");
                CacheResult::Hit(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!(key = %key, "cache expired for summary");
                entries.remove(&key);
                CacheResult::Expired
            }
            None => CacheResult::Miss,
        }
    }

    /// Store a summary for the given input text.
    pub fn set(&self, input: &str, value: &str) {
        if !self.enabled {
            return;
        }

        let key = Self::key(input);
        let mut entries = self.entries.lock().expect("summary cache mutex poisoned");
        entries.insert(
            key,
            CacheEntry {
                cached_at: Instant::now(),
                value: value.to_string(),
            },
        );
    }
}
