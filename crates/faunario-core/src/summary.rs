//! Best-effort encyclopedia lookups for animal descriptions.
//!
//! Queries the Spanish Wikipedia REST summary endpoint. Every failure mode is
//! typed; the pipeline never aborts on a lookup problem and falls back to a
//! placeholder string instead.

use crate::config::{AppConfig, NetworkConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Typed failures from the summary service.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Ambiguous term '{term}': landed on a disambiguation page")]
    Ambiguous { term: String },

    #[error("No encyclopedia page found for '{term}'")]
    NotFound { term: String },

    #[error("Summary lookup failed: {message}")]
    Network { message: String },
}

/// Shape of the REST summary response, reduced to what we read.
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type")]
    page_type: Option<String>,
    extract: Option<String>,
}

/// Client for the summary-by-search-term service.
pub struct SummaryClient {
    client: reqwest::Client,
    api_base: String,
}

impl SummaryClient {
    pub fn new() -> Result<Self, SummaryError> {
        Self::with_base(NetworkConfig::SUMMARY_API_BASE)
    }

    /// Use a non-default endpoint (tests point this at a local server).
    pub fn with_base(api_base: impl Into<String>) -> Result<Self, SummaryError> {
        let client = reqwest::Client::builder()
            .timeout(NetworkConfig::REQUEST_TIMEOUT)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| SummaryError::Network {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Fetch a short descriptive text for the term.
    pub async fn fetch(&self, term: &str) -> Result<String, SummaryError> {
        let url = format!("{}/{}", self.api_base, urlencoding::encode(term));
        debug!("Summary lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SummaryError::Network {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| SummaryError::Network {
            message: e.to_string(),
        })?;

        parse_summary(term, status, &body)
    }

    /// Fetch, degrading to the placeholder description on any failure.
    pub async fn fetch_or_placeholder(&self, term: &str) -> String {
        match self.fetch(term).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Summary lookup for '{}' failed ({}), using placeholder", term, e);
                AppConfig::PLACEHOLDER_DESCRIPTION.to_string()
            }
        }
    }
}

/// Map a raw endpoint response to a summary or a typed failure.
fn parse_summary(term: &str, status: u16, body: &str) -> Result<String, SummaryError> {
    if status == 404 {
        return Err(SummaryError::NotFound {
            term: term.to_string(),
        });
    }
    if status != 200 {
        return Err(SummaryError::Network {
            message: format!("unexpected status {}", status),
        });
    }

    let parsed: SummaryResponse =
        serde_json::from_str(body).map_err(|e| SummaryError::Network {
            message: format!("malformed response: {}", e),
        })?;

    if parsed.page_type.as_deref() == Some("disambiguation") {
        return Err(SummaryError::Ambiguous {
            term: term.to_string(),
        });
    }

    match parsed.extract {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(SummaryError::NotFound {
            term: term.to_string(),
        }),
    }
}
