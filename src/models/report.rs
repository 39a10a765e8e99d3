//! Resolution reports: the artifact returned from every resolution call.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::credentials::CredentialSource;

/// Outcome of a single provider invocation.
///
/// Every failure mode a provider can exhibit is funneled into one of these
/// variants; no attempt failure is ever raised as an error to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptStatus {
    /// The provider's record passed the quality predicate.
    Accepted,

    /// The record parsed but failed the quality predicate. Retained as a
    /// merge candidate, not discarded.
    RejectedByQuality,

    /// The provider responded with a non-success HTTP status.
    HttpError,

    /// Transport-level failure (DNS, connection, timeout).
    NetworkError,

    /// The response body was not valid or expected JSON.
    ParseError,

    /// The provider responded successfully but had no usable payload.
    Empty,

    /// No credential was available for the provider; no network I/O happened.
    ConfigurationError,
}

/// The record of one provider invocation within a resolution.
///
/// Appended in call order and never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Provider identifier (e.g. "crossref")
    pub provider: String,

    /// How the attempt ended
    pub status: AttemptStatus,

    /// Wall-clock duration of the provider call
    pub latency_ms: u64,

    /// Human-readable failure detail, absent on acceptance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    /// Which kind of credential backed the call (absent on
    /// configuration-error, where no credential was selected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_source: Option<CredentialSource>,
}

/// The artifact returned to the caller of a resolution.
///
/// Created fresh per call and never persisted. `field_sources` names the
/// provider that supplied each field patched in by merging; fields absent
/// from the map came from `winning_provider` itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport<R> {
    /// The final merged record, or `None` on total exhaustion
    pub result: Option<R>,

    /// The provider whose response formed the basis of `result`
    pub winning_provider: Option<String>,

    /// One entry per provider actually invoked, in call order
    pub attempts: Vec<Attempt>,

    /// Field name -> provider that patched it during merging
    pub field_sources: BTreeMap<String, String>,
}

impl<R> ResolutionReport<R> {
    pub fn empty() -> Self {
        Self {
            result: None,
            winning_provider: None,
            attempts: Vec::new(),
            field_sources: BTreeMap::new(),
        }
    }

    /// Names of all providers tried, in call order.
    pub fn tried_providers(&self) -> Vec<String> {
        self.attempts.iter().map(|a| a.provider.clone()).collect()
    }

    /// Whether the resolution failed purely because no credentials were
    /// configured. Callers treat this as fatal (no resolution was possible
    /// at all), unlike ordinary exhaustion.
    pub fn failed_on_configuration(&self) -> bool {
        self.result.is_none()
            && !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|a| a.status == AttemptStatus::ConfigurationError)
    }

    /// Convert into the caller-facing wire shape.
    pub fn into_wire(self) -> WireResponse<R> {
        let tried_providers = self.tried_providers();
        let config_failure = self.failed_on_configuration();
        match (self.result, self.winning_provider) {
            (Some(data), Some(source)) => WireResponse::Success {
                success: true,
                data,
                source,
                tried_providers,
            },
            _ => {
                let error = if config_failure {
                    "no credentials configured for this capability".to_string()
                } else {
                    "no provider returned a usable result".to_string()
                };
                WireResponse::Failure {
                    error,
                    tried_providers,
                }
            }
        }
    }
}

/// Caller-facing serialization of a [`ResolutionReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireResponse<R> {
    #[serde(rename_all = "camelCase")]
    Success {
        success: bool,
        data: R,
        source: String,
        tried_providers: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        error: String,
        tried_providers: Vec<String>,
    },
}

impl<R> WireResponse<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, WireResponse::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Summary;

    fn attempt(provider: &str, status: AttemptStatus) -> Attempt {
        Attempt {
            provider: provider.to_string(),
            status,
            latency_ms: 5,
            error_detail: None,
            credential_source: None,
        }
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_value(AttemptStatus::RejectedByQuality).unwrap();
        assert_eq!(json, "rejected-by-quality");

        let json = serde_json::to_value(AttemptStatus::ConfigurationError).unwrap();
        assert_eq!(json, "configuration-error");
    }

    #[test]
    fn test_wire_success_shape() {
        let report = ResolutionReport {
            result: Some(Summary::new("short text")),
            winning_provider: Some("gemini".to_string()),
            attempts: vec![attempt("gemini", AttemptStatus::Accepted)],
            field_sources: BTreeMap::new(),
        };

        let wire = report.into_wire();
        assert!(wire.is_success());

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["source"], "gemini");
        assert_eq!(json["triedProviders"][0], "gemini");
    }

    #[test]
    fn test_wire_failure_lists_tried_providers() {
        let report: ResolutionReport<Summary> = ResolutionReport {
            result: None,
            winning_provider: None,
            attempts: vec![
                attempt("gemini", AttemptStatus::Empty),
                attempt("mistral", AttemptStatus::NetworkError),
            ],
            field_sources: BTreeMap::new(),
        };

        let wire = report.into_wire();
        assert!(!wire.is_success());

        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("success").is_none());
        assert_eq!(json["triedProviders"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_on_configuration() {
        let all_config: ResolutionReport<Summary> = ResolutionReport {
            result: None,
            winning_provider: None,
            attempts: vec![attempt("gemini", AttemptStatus::ConfigurationError)],
            field_sources: BTreeMap::new(),
        };
        assert!(all_config.failed_on_configuration());

        let mixed: ResolutionReport<Summary> = ResolutionReport {
            result: None,
            winning_provider: None,
            attempts: vec![
                attempt("gemini", AttemptStatus::ConfigurationError),
                attempt("mistral", AttemptStatus::Empty),
            ],
            field_sources: BTreeMap::new(),
        };
        assert!(!mixed.failed_on_configuration());
    }
}
