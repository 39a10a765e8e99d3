//! DataCite DOI registry adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::credentials::Credential;
use crate::models::{BibRecord, UNKNOWN_YEAR};
use crate::providers::{rejection_from_response, ProviderAdapter, Rejection};
use crate::utils::HttpClient;

const DATACITE_API_BASE: &str = "https://api.datacite.org";

/// DataCite DOI registry
///
/// Secondary structured registry; covers datasets, reports and other works
/// CrossRef does not index. No authentication required for lookups.
#[derive(Debug, Clone)]
pub struct DataCiteProvider {
    client: HttpClient,
    base_url: String,
}

impl DataCiteProvider {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: DATACITE_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for DataCiteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter<BibRecord> for DataCiteProvider {
    fn name(&self) -> &str {
        "datacite"
    }

    async fn attempt(&self, doi: &str, _credential: &Credential) -> Result<BibRecord, Rejection> {
        let url = format!("{}/dois/{}", self.base_url, urlencoding::encode(doi));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Rejection::Network(format!("DataCite request failed: {}", e)))?;

        if response.status().as_u16() == 404 {
            return Err(Rejection::Empty);
        }
        if !response.status().is_success() {
            return Err(rejection_from_response(response).await);
        }

        let envelope: DcEnvelope = response
            .json()
            .await
            .map_err(|e| Rejection::Parse(format!("DataCite JSON: {}", e)))?;

        let attributes = envelope.data.attributes;
        let mut record = BibRecord::unknown(doi);

        record.title = attributes
            .titles
            .into_iter()
            .filter_map(|t| t.title)
            .next()
            .unwrap_or_default();
        record.authors = attributes
            .creators
            .into_iter()
            .filter_map(DcCreator::display_name)
            .collect();
        record.publisher = attributes.publisher.unwrap_or_default();
        record.year = attributes
            .publication_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        record.journal = attributes
            .container
            .and_then(|c| c.title)
            .unwrap_or_default();
        record.url = attributes.url.unwrap_or_default();
        record.r#abstract = attributes
            .descriptions
            .into_iter()
            .filter_map(|d| d.description)
            .next()
            .unwrap_or_default();
        record.entry_type = attributes
            .types
            .and_then(|t| t.resource_type_general)
            .map(|t| t.to_lowercase())
            .unwrap_or_default();

        if record.is_bare() {
            return Err(Rejection::Empty);
        }
        Ok(record)
    }
}

// ===== DataCite API Types =====

#[derive(Debug, Deserialize)]
struct DcEnvelope {
    data: DcData,
}

#[derive(Debug, Deserialize)]
struct DcData {
    attributes: DcAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DcAttributes {
    #[serde(default)]
    titles: Vec<DcTitle>,
    #[serde(default)]
    creators: Vec<DcCreator>,
    publisher: Option<String>,
    publication_year: Option<i64>,
    container: Option<DcContainer>,
    url: Option<String>,
    #[serde(default)]
    descriptions: Vec<DcDescription>,
    types: Option<DcTypes>,
}

#[derive(Debug, Deserialize)]
struct DcTitle {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DcCreator {
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

impl DcCreator {
    fn display_name(self) -> Option<String> {
        match (self.given_name, self.family_name) {
            (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
            // DataCite's `name` field is "Family, Given"; flip it back.
            _ => self.name.map(|name| match name.split_once(", ") {
                Some((family, given)) => format!("{} {}", given, family),
                None => name,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DcContainer {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DcDescription {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DcTypes {
    resource_type_general: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_name_flip() {
        let inverted = DcCreator {
            name: Some("Curie, Marie".into()),
            given_name: None,
            family_name: None,
        };
        assert_eq!(inverted.display_name(), Some("Marie Curie".to_string()));

        let split = DcCreator {
            name: None,
            given_name: Some("Marie".into()),
            family_name: Some("Curie".into()),
        };
        assert_eq!(split.display_name(), Some("Marie Curie".to_string()));
    }
}
