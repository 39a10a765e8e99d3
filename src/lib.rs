//! # refsolve
//!
//! A multi-provider resolution engine for citation metadata and text
//! summarization. One logical operation (DOI lookup, ISBN lookup,
//! summarize) is satisfied by trying several independent external providers
//! in priority order, judging whether each response is good enough, merging
//! partial results, and rotating among pooled credentials.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Normalized record shapes and resolution reports
//! - [`credentials`]: Credential pools with stateless rotation
//! - [`providers`]: Provider adapters with a trait-based architecture
//! - [`resolver`]: The sequential resolution loop, quality predicates and
//!   gap-filling merge
//! - [`utils`]: HTTP client and summary cache
//! - [`config`]: Configuration management

pub mod config;
pub mod credentials;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod utils;

// Re-export commonly used types
pub use models::{BibRecord, BookRecord, ResolutionReport, Summary};
pub use providers::{ProviderAdapter, ResolverRegistry};
pub use resolver::{SequentialResolver, SummaryResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
