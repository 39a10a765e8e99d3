//! Sequential multi-provider resolution.
//!
//! The [`SequentialResolver`] orchestrates an ordered provider chain for one
//! capability: each provider is tried in priority order until one response
//! passes the capability's quality predicate or the chain is exhausted.
//! Every invocation is recorded as an [`Attempt`]; no provider failure ever
//! escapes as an error to the caller.
//!
//! Provider calls are awaited strictly in sequence, never in parallel: a
//! later provider must not be invoked when an earlier one already satisfies
//! the predicate, and concurrent calls would multiply API cost for no
//! benefit in the common case. Independent resolutions run as independent
//! tasks sharing only the stateless credential pools.

pub mod merge;
pub mod quality;

pub use merge::Mergeable;
pub use quality::QualityPredicate;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::credentials::CredentialPool;
use crate::models::{Attempt, AttemptStatus, ResolutionReport, Summary};
use crate::providers::{Capability, ProviderAdapter};
use crate::utils::{CacheResult, SummaryCache};

/// One provider in a chain: the adapter plus the credential pool for its
/// provider family.
pub struct ProviderEntry<R> {
    pub adapter: Arc<dyn ProviderAdapter<R>>,
    pub pool: CredentialPool,
}

impl<R> ProviderEntry<R> {
    pub fn new(adapter: Arc<dyn ProviderAdapter<R>>, pool: CredentialPool) -> Self {
        Self { adapter, pool }
    }
}

/// Orchestrates an ordered list of provider adapters for one capability.
pub struct SequentialResolver<R: Mergeable> {
    capability: Capability,
    providers: Vec<ProviderEntry<R>>,
    predicate: QualityPredicate<R>,
    enricher: Option<ProviderEntry<R>>,
}

impl<R: Mergeable> SequentialResolver<R> {
    pub fn new(
        capability: Capability,
        providers: Vec<ProviderEntry<R>>,
        predicate: QualityPredicate<R>,
    ) -> Self {
        Self {
            capability,
            providers,
            predicate,
            enricher: None,
        }
    }

    /// Attach a designated enrichment provider, invoked once after an
    /// acceptance when the accepted record still has gaps.
    pub fn with_enricher(mut self, entry: ProviderEntry<R>) -> Self {
        self.enricher = Some(entry);
        self
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Resolve `input` against the provider chain.
    ///
    /// Always completes with a [`ResolutionReport`]; individual attempt
    /// failures are recorded, not raised. An `override_secret` supplied by
    /// the caller bypasses pool selection for every provider family whose
    /// credential shape it matches.
    pub async fn resolve(&self, input: &str, override_secret: Option<&str>) -> ResolutionReport<R> {
        let mut attempts: Vec<Attempt> = Vec::new();
        let mut partials: Vec<(String, R)> = Vec::new();

        for entry in &self.providers {
            let provider = entry.adapter.name().to_string();

            let credential = match entry.pool.select(override_secret) {
                Ok(credential) => credential,
                Err(err) => {
                    warn!(
                        capability = %self.capability,
                        provider = %provider,
                        "skipping provider, {err}"
                    );
                    attempts.push(Attempt {
                        provider,
                        status: AttemptStatus::ConfigurationError,
                        latency_ms: 0,
                        error_detail: Some(err.to_string()),
                        credential_source: None,
                    });
                    continue;
                }
            };
            let credential_source = credential.source;

            let started = Instant::now();
            let outcome = entry.adapter.attempt(input, &credential).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(record) => {
                    if (self.predicate)(&record) {
                        info!(
                            capability = %self.capability,
                            provider = %provider,
                            latency_ms,
                            "provider accepted"
                        );
                        attempts.push(Attempt {
                            provider: provider.clone(),
                            status: AttemptStatus::Accepted,
                            latency_ms,
                            error_detail: None,
                            credential_source: Some(credential_source),
                        });
                        return self
                            .finalize_accepted(input, provider, record, attempts, override_secret)
                            .await;
                    }

                    debug!(
                        capability = %self.capability,
                        provider = %provider,
                        "record rejected by quality predicate"
                    );
                    attempts.push(Attempt {
                        provider: provider.clone(),
                        status: AttemptStatus::RejectedByQuality,
                        latency_ms,
                        error_detail: None,
                        credential_source: Some(credential_source),
                    });
                    // Quality-rejected does not mean discarded: a partial
                    // with real data is retained as a merge base.
                    if record.is_usable_partial() {
                        partials.push((provider, record));
                    }
                }
                Err(rejection) => {
                    debug!(
                        capability = %self.capability,
                        provider = %provider,
                        latency_ms,
                        "provider attempt failed: {rejection}"
                    );
                    attempts.push(Attempt {
                        provider,
                        status: rejection.status(),
                        latency_ms,
                        error_detail: Some(rejection.to_string()),
                        credential_source: Some(credential_source),
                    });
                }
            }
        }

        self.finalize_exhausted(attempts, partials)
    }

    /// An accepted record may still carry sentinel fields; the designated
    /// enricher (when configured) is given one shot at patching them.
    async fn finalize_accepted(
        &self,
        input: &str,
        winner: String,
        mut record: R,
        mut attempts: Vec<Attempt>,
        override_secret: Option<&str>,
    ) -> ResolutionReport<R> {
        let mut field_sources = BTreeMap::new();

        if record.has_gaps() {
            if let Some(enricher) = &self.enricher {
                self.run_enricher(
                    enricher,
                    input,
                    &mut record,
                    &mut attempts,
                    &mut field_sources,
                    override_secret,
                )
                .await;
            }
        }

        ResolutionReport {
            result: Some(record),
            winning_provider: Some(winner),
            attempts,
            field_sources,
        }
    }

    async fn run_enricher(
        &self,
        entry: &ProviderEntry<R>,
        input: &str,
        record: &mut R,
        attempts: &mut Vec<Attempt>,
        field_sources: &mut BTreeMap<String, String>,
        override_secret: Option<&str>,
    ) {
        let provider = entry.adapter.name().to_string();

        let credential = match entry.pool.select(override_secret) {
            Ok(credential) => credential,
            Err(err) => {
                attempts.push(Attempt {
                    provider,
                    status: AttemptStatus::ConfigurationError,
                    latency_ms: 0,
                    error_detail: Some(err.to_string()),
                    credential_source: None,
                });
                return;
            }
        };
        let credential_source = credential.source;

        let started = Instant::now();
        let outcome = entry.adapter.attempt(input, &credential).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(enrichment) => {
                let patched = record.fill_gaps_from(&enrichment);
                debug!(
                    capability = %self.capability,
                    provider = %provider,
                    patched = patched.len(),
                    "enrichment merged"
                );
                for field in patched {
                    field_sources.insert(field.to_string(), provider.clone());
                }
                attempts.push(Attempt {
                    provider,
                    status: AttemptStatus::Accepted,
                    latency_ms,
                    error_detail: None,
                    credential_source: Some(credential_source),
                });
            }
            Err(rejection) => {
                attempts.push(Attempt {
                    provider,
                    status: rejection.status(),
                    latency_ms,
                    error_detail: Some(rejection.to_string()),
                    credential_source: Some(credential_source),
                });
            }
        }
    }

    /// No provider was accepted outright. If any returned a usable partial,
    /// the highest-priority one becomes the merge base and later partials
    /// patch its gaps; otherwise the exhaustion is surfaced as-is.
    fn finalize_exhausted(
        &self,
        attempts: Vec<Attempt>,
        partials: Vec<(String, R)>,
    ) -> ResolutionReport<R> {
        let mut iter = partials.into_iter();
        let Some((base_provider, mut record)) = iter.next() else {
            info!(capability = %self.capability, "all providers exhausted with no usable result");
            return ResolutionReport {
                result: None,
                winning_provider: None,
                attempts,
                field_sources: BTreeMap::new(),
            };
        };

        let mut field_sources = BTreeMap::new();
        for (provider, partial) in iter {
            for field in record.fill_gaps_from(&partial) {
                field_sources.insert(field.to_string(), provider.clone());
            }
        }

        info!(
            capability = %self.capability,
            base = %base_provider,
            "no provider accepted outright, returning merged partial"
        );
        ResolutionReport {
            result: Some(record),
            winning_provider: Some(base_provider),
            attempts,
            field_sources,
        }
    }
}

/// The summarization variant: a [`SequentialResolver`] fronted by a TTL
/// cache. A cache hit returns the identical string with zero provider
/// attempts recorded.
pub struct SummaryResolver {
    inner: SequentialResolver<Summary>,
    cache: SummaryCache,
}

impl SummaryResolver {
    pub fn new(inner: SequentialResolver<Summary>, cache: SummaryCache) -> Self {
        Self { inner, cache }
    }

    pub fn provider_count(&self) -> usize {
        self.inner.provider_count()
    }

    pub async fn resolve(
        &self,
        text: &str,
        override_secret: Option<&str>,
    ) -> ResolutionReport<Summary> {
        if let CacheResult::Hit(cached) = self.cache.get(text) {
            return ResolutionReport {
                result: Some(Summary::new(cached)),
                winning_provider: Some("cache".to_string()),
                attempts: Vec::new(),
                field_sources: BTreeMap::new(),
            };
        }

        let report = self.inner.resolve(text, override_secret).await;
        if let Some(summary) = &report.result {
            self.cache.set(text, summary.as_str());
        }
        report
    }
}
