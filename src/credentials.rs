//! Credential pooling and rotation for provider families.
//!
//! A [`CredentialPool`] holds the interchangeable secrets configured for one
//! provider family and hands out one per call. Selection is stateless and
//! uniform-random, so concurrent resolutions share pools without locks or
//! counters. A caller-supplied override credential bypasses the pool for
//! that single call, but only for families whose key shape it matches.

use rand::Rng;
use regex::Regex;
use serde::Serialize;

/// Where a selected credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialSource {
    /// Drawn from the configured pool (or anonymous access).
    Pool,

    /// Supplied by the caller for this single call; the pool was not
    /// consulted. Callers use this tag as a quota-bypass signal.
    UserSupplied,
}

/// An opaque secret selected for one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub secret: String,
    pub source: CredentialSource,
}

impl Credential {
    /// Anonymous access for providers that require no authentication.
    pub fn anonymous() -> Self {
        Self {
            secret: String::new(),
            source: CredentialSource::Pool,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.secret.is_empty()
    }
}

/// Errors that can occur while selecting a credential.
///
/// Distinct from provider failures: a configuration error means the call
/// was never worth making, and the resolver records it without network I/O.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The provider family requires a credential and none is configured.
    #[error("no credential configured for provider family '{0}'")]
    Unconfigured(String),
}

/// A set of interchangeable secrets for one provider family.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    family: String,
    keys: Vec<String>,
    shape: Option<Regex>,
    auth_required: bool,
}

impl CredentialPool {
    /// A pool of rotating keys for a family that requires authentication.
    pub fn new(family: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            family: family.into(),
            keys: keys
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            shape: None,
            auth_required: true,
        }
    }

    /// A pool for a family that needs no authentication (open registries).
    /// Selection always succeeds with an anonymous credential.
    pub fn anonymous(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            keys: Vec::new(),
            shape: None,
            auth_required: false,
        }
    }

    /// A pool for a family where a key improves service but is not required.
    pub fn optional(family: impl Into<String>, keys: Vec<String>) -> Self {
        let mut pool = Self::new(family, keys);
        pool.auth_required = false;
        pool
    }

    /// A single fixed credential, used for fallback providers that are not
    /// worth rotating.
    pub fn fixed(family: impl Into<String>, key: Option<String>) -> Self {
        Self::new(family, key.into_iter().collect())
    }

    /// Restrict caller-supplied overrides to secrets matching `pattern`.
    /// An invalid pattern leaves the pool without a shape check.
    pub fn with_shape(mut self, pattern: &str) -> Self {
        self.shape = Regex::new(pattern).ok();
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether an override secret looks like a credential for this family.
    /// Families without a shape pattern never adopt overrides, so a key
    /// meant for one provider cannot leak into another's requests.
    fn accepts_override(&self, secret: &str) -> bool {
        match &self.shape {
            Some(re) => re.is_match(secret),
            None => false,
        }
    }

    /// Select a credential for one call.
    ///
    /// An override matching the family's shape short-circuits pool
    /// selection entirely and is tagged
    /// [`CredentialSource::UserSupplied`]. Otherwise one pooled key is
    /// picked uniformly at random; an empty required pool is a
    /// configuration failure.
    pub fn select(&self, override_secret: Option<&str>) -> Result<Credential, CredentialError> {
        if let Some(secret) = override_secret {
            if self.accepts_override(secret) {
                return Ok(Credential {
                    secret: secret.to_string(),
                    source: CredentialSource::UserSupplied,
                });
            }
        }

        if self.keys.is_empty() {
            if self.auth_required {
                return Err(CredentialError::Unconfigured(self.family.clone()));
            }
            return Ok(Credential::anonymous());
        }

        let idx = if self.keys.len() == 1 {
            0
        } else {
            rand::rng().random_range(0..self.keys.len())
        };

        Ok(Credential {
            secret: self.keys[idx].clone(),
            source: CredentialSource::Pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_required_pool_is_configuration_failure() {
        let pool = CredentialPool::new("gemini", Vec::new());

        let err = pool.select(None).unwrap_err();
        assert!(matches!(err, CredentialError::Unconfigured(family) if family == "gemini"));
    }

    #[test]
    fn test_anonymous_pool_always_selects() {
        let pool = CredentialPool::anonymous("crossref");

        let credential = pool.select(None).unwrap();
        assert!(credential.is_anonymous());
        assert_eq!(credential.source, CredentialSource::Pool);
    }

    #[test]
    fn test_selection_stays_within_pool() {
        let pool = CredentialPool::new("gemini", vec!["k1".into(), "k2".into(), "k3".into()]);

        for _ in 0..50 {
            let credential = pool.select(None).unwrap();
            assert!(["k1", "k2", "k3"].contains(&credential.secret.as_str()));
            assert_eq!(credential.source, CredentialSource::Pool);
        }
    }

    #[test]
    fn test_override_bypasses_pool() {
        let pool = CredentialPool::new("gemini", vec!["pooled".into()])
            .with_shape(r"^AIza[0-9A-Za-z_\-]{8,}$");

        let credential = pool.select(Some("AIzaMyOwnKey123")).unwrap();
        assert_eq!(credential.secret, "AIzaMyOwnKey123");
        assert_eq!(credential.source, CredentialSource::UserSupplied);
    }

    #[test]
    fn test_shapeless_pool_ignores_override() {
        // A fixed fallback pool has no shape; a key meant for another
        // family must not displace its configured credential.
        let pool = CredentialPool::fixed("mistral", Some("configured-mistral-key".into()));

        let credential = pool.select(Some("AIzaSyGeminiShaped123")).unwrap();
        assert_eq!(credential.secret, "configured-mistral-key");
        assert_eq!(credential.source, CredentialSource::Pool);
    }

    #[test]
    fn test_override_must_match_shape() {
        let pool = CredentialPool::new("gemini", vec!["pooled".into()])
            .with_shape(r"^AIza[0-9A-Za-z_\-]{8,}$");

        // Wrong shape falls back to the pool.
        let credential = pool.select(Some("not-a-gemini-key")).unwrap();
        assert_eq!(credential.secret, "pooled");
        assert_eq!(credential.source, CredentialSource::Pool);

        let credential = pool.select(Some("AIzaSyAbCdEf123")).unwrap();
        assert_eq!(credential.source, CredentialSource::UserSupplied);
    }

    #[test]
    fn test_anonymous_pool_ignores_override() {
        let pool = CredentialPool::anonymous("crossref");

        let credential = pool.select(Some("whatever")).unwrap();
        assert!(credential.is_anonymous());
        assert_eq!(credential.source, CredentialSource::Pool);
    }

    #[test]
    fn test_optional_pool_without_keys() {
        let pool = CredentialPool::optional("google-books", Vec::new());

        let credential = pool.select(None).unwrap();
        assert!(credential.is_anonymous());
    }

    #[test]
    fn test_fixed_pool() {
        let pool = CredentialPool::fixed("mistral", Some("fixed-key".into()));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.select(None).unwrap().secret, "fixed-key");

        let unconfigured = CredentialPool::fixed("mistral", None);
        assert!(unconfigured.select(None).is_err());
    }

    #[test]
    fn test_blank_keys_are_dropped() {
        let pool = CredentialPool::new("gemini", vec![" ".into(), String::new(), "real".into()]);
        assert_eq!(pool.len(), 1);
    }
}
