//! HTTP client for the statistics endpoint.
//!
//! One operation: GET the configured base URL with a `student_id` query
//! parameter and decode the body as a JSON array of number-coercible
//! values. Failures are classified per stage — transport, HTTP status,
//! body decode — so the UI can surface them by kind.

use std::time::Duration;

use gradeviz_core::{FetchFailure, StatisticsSeries};
use thiserror::Error;
use tracing::debug;

/// Base URL of the observed deployment.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/grade_statistics/";

/// Per-request timeout bounding the in-flight state.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter carrying the identifier, fixed regardless of domain.
const IDENTIFIER_PARAM: &str = "student_id";

/// Errors from a single statistics fetch.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connect, timeout, or mid-transfer failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {code}")]
    Status { code: u16 },

    /// The body was not a JSON array of number-coercible values.
    #[error("invalid response body: {message}")]
    Decode { message: String },
}

impl ClientError {
    /// Collapse into the UI-facing failure taxonomy.
    pub fn to_failure(&self) -> FetchFailure {
        match self {
            ClientError::Transport { source, .. } => FetchFailure::Unreachable {
                message: source.to_string(),
            },
            ClientError::Status { code } => FetchFailure::BadStatus { code: *code },
            ClientError::Decode { message } => FetchFailure::InvalidData {
                message: message.clone(),
            },
        }
    }
}

/// Client for the statistics endpoint.
#[derive(Debug, Clone)]
pub struct StatisticsClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl Default for StatisticsClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl StatisticsClient {
    /// Create a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            http: reqwest::Client::new(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the statistics series for an identifier.
    ///
    /// Issues exactly one GET; no retry. The identifier is passed through
    /// raw — empty strings included — as the `student_id` query parameter.
    pub async fn fetch_statistics(
        &self,
        identifier: &str,
    ) -> Result<StatisticsSeries, ClientError> {
        debug!(identifier, url = %self.base_url, "statistics_fetch_start");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[(IDENTIFIER_PARAM, identifier)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: self.base_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                code: status.as_u16(),
            });
        }

        let values: Vec<serde_json::Value> =
            response.json().await.map_err(|e| ClientError::Decode {
                message: e.to_string(),
            })?;

        let series = StatisticsSeries::from_json_array(&values)
            .map_err(|message| ClientError::Decode { message })?;

        debug!(points = series.len(), "statistics_fetch_complete");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_collapse_to_failure_kinds() {
        let status = ClientError::Status { code: 404 };
        assert_eq!(
            status.to_failure(),
            FetchFailure::BadStatus { code: 404 }
        );

        let decode = ClientError::Decode {
            message: "element 0 is not a number: null".into(),
        };
        assert!(matches!(
            decode.to_failure(),
            FetchFailure::InvalidData { .. }
        ));
    }
}
