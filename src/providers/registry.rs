//! Assembly of per-capability provider chains.
//!
//! Chain order is a static priority list: structured registries first, the
//! AI estimator last, since its answers carry no verifiable provenance and
//! are trusted only when nothing else yields authors or a year.

use std::sync::Arc;

use crate::config::Config;
use crate::credentials::CredentialPool;
use crate::models::{BibRecord, BookRecord};
use crate::providers::{
    Capability, CohereProvider, CrossRefProvider, DataCiteProvider, GeminiBookEstimator,
    GeminiCitationEstimator, GeminiSummarizer, GoogleBooksProvider, MistralProvider,
    OpenAlexProvider, OpenLibraryProvider,
};
use crate::resolver::{quality, ProviderEntry, SequentialResolver, SummaryResolver};
use crate::utils::SummaryCache;

/// Gemini API keys start with "AIza"; the tail length varies a little
/// across key types.
const GEMINI_KEY_SHAPE: &str = r"^AIza[0-9A-Za-z_\-]{30,40}$";

/// All capability resolvers, wired from one [`Config`] at startup.
pub struct ResolverRegistry {
    doi: SequentialResolver<BibRecord>,
    isbn: SequentialResolver<BookRecord>,
    summarize: SummaryResolver,
}

impl ResolverRegistry {
    pub fn from_config(config: &Config) -> Self {
        let gemini_pool = CredentialPool::new("gemini", config.api_keys.gemini.clone())
            .with_shape(GEMINI_KEY_SHAPE);

        let doi = SequentialResolver::new(
            Capability::Doi,
            vec![
                ProviderEntry::new(
                    Arc::new(CrossRefProvider::new()),
                    CredentialPool::anonymous("crossref"),
                ),
                ProviderEntry::new(
                    Arc::new(DataCiteProvider::new()),
                    CredentialPool::anonymous("datacite"),
                ),
                ProviderEntry::new(
                    Arc::new(OpenAlexProvider::new()),
                    CredentialPool::anonymous("openalex"),
                ),
                ProviderEntry::new(Arc::new(GeminiCitationEstimator::new()), gemini_pool.clone()),
            ],
            quality::bibliographic(),
        );

        let isbn = SequentialResolver::new(
            Capability::Isbn,
            vec![
                ProviderEntry::new(
                    Arc::new(OpenLibraryProvider::new()),
                    CredentialPool::anonymous("openlibrary"),
                ),
                ProviderEntry::new(
                    Arc::new(GoogleBooksProvider::new()),
                    CredentialPool::optional("google-books", config.api_keys.google_books.clone()),
                ),
            ],
            quality::book(),
        )
        .with_enricher(ProviderEntry::new(
            Arc::new(GeminiBookEstimator::new()),
            gemini_pool.clone(),
        ));

        let summarize = SummaryResolver::new(
            SequentialResolver::new(
                Capability::Summarize,
                vec![
                    ProviderEntry::new(Arc::new(GeminiSummarizer::new()), gemini_pool),
                    ProviderEntry::new(
                        Arc::new(MistralProvider::new()),
                        CredentialPool::fixed("mistral", config.api_keys.mistral.clone()),
                    ),
                    ProviderEntry::new(
                        Arc::new(CohereProvider::new()),
                        CredentialPool::fixed("cohere", config.api_keys.cohere.clone()),
                    ),
                ],
                quality::summary(config.summarize.word_band()),
            ),
            SummaryCache::from_config(&config.cache),
        );

        Self {
            doi,
            isbn,
            summarize,
        }
    }

    pub fn doi(&self) -> &SequentialResolver<BibRecord> {
        &self.doi
    }

    pub fn isbn(&self) -> &SequentialResolver<BookRecord> {
        &self.isbn
    }

    pub fn summarize(&self) -> &SummaryResolver {
        &self.summarize
    }
}
