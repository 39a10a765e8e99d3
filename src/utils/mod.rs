//! Utility modules supporting resolution operations.
//!
//! - [`HttpClient`]: shared HTTP client with fixed per-attempt timeouts
//! - [`SummaryCache`]: in-memory TTL cache for summarization outputs
//! - [`CacheResult`]: outcome of a cache lookup (hit / miss / expired)

mod cache;
mod http;

pub use cache::{CacheResult, SummaryCache};
pub use http::{HttpClient, GENERATION_TIMEOUT, METADATA_TIMEOUT};
