//! Resolution of the most recent available image time.
//!
//! The archive publishes a small JSON document naming the newest full-disk
//! observation:
//!
//! ```json
//! {"date": "2023-11-05 14:20:00", "file": "PI_H09_20231105_1420_TRC_FLDK_R10_PGPFD.png"}
//! ```

use crate::source::{AsyncHttpClient, FetchError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Metadata endpoint listing the latest observation.
pub const DEFAULT_LATEST_URL: &str = "http://himawari8-dl.nict.go.jp/himawari8/img/D531106/latest.json";

/// Format of the `date` field (UTC).
pub const LATEST_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors resolving the latest observation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatestError {
    /// Request for the metadata document failed
    #[error("failed to fetch latest metadata: {0}")]
    Fetch(#[from] FetchError),

    /// Body was not the expected JSON document
    #[error("invalid latest metadata: {0}")]
    Json(String),

    /// `date` did not match the expected format
    #[error("invalid latest timestamp '{value}': {reason}")]
    TimeParse { value: String, reason: String },
}

/// Body of the latest-metadata document.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestMetadata {
    pub date: String,
    #[serde(default)]
    pub file: Option<String>,
}

/// Parses a metadata timestamp as UTC.
///
/// ```
/// use himawari::latest::parse_timestamp;
///
/// let t = parse_timestamp("2016-01-02 03:40:00").unwrap();
/// assert_eq!(t.to_rfc3339(), "2016-01-02T03:40:00+00:00");
/// ```
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, LatestError> {
    NaiveDateTime::parse_from_str(value, LATEST_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| LatestError::TimeParse {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Queries the metadata endpoint for the newest available image time.
pub struct LatestResolver<C: AsyncHttpClient> {
    client: C,
    url: String,
}

impl<C: AsyncHttpClient> LatestResolver<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            url: DEFAULT_LATEST_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches and parses the metadata document.
    pub async fn metadata(&self) -> Result<LatestMetadata, LatestError> {
        let body = self.client.get(&self.url).await?;
        serde_json::from_slice(&body).map_err(|e| LatestError::Json(e.to_string()))
    }

    /// Returns the newest observation time in UTC.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn latest(&self) -> Result<DateTime<Utc>, LatestError> {
        let metadata = self.metadata().await?;
        let latest = parse_timestamp(&metadata.date)?;
        debug!(latest = %latest, file = ?metadata.file, "Resolved latest image time");
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockHttpClient;
    use chrono::TimeZone;

    fn resolver(body: &str) -> LatestResolver<MockHttpClient> {
        LatestResolver::new(MockHttpClient::new(Ok(body.as_bytes().to_vec())))
    }

    #[tokio::test]
    async fn test_latest_parses_date() {
        let resolver = resolver(r#"{"date":"2023-11-05 14:20:00","file":"x.png"}"#);

        let latest = resolver.latest().await.unwrap();

        assert_eq!(latest, Utc.with_ymd_and_hms(2023, 11, 5, 14, 20, 0).unwrap());
    }

    #[tokio::test]
    async fn test_latest_file_is_optional() {
        let resolver = resolver(r#"{"date":"2023-11-05 14:20:00"}"#);
        let metadata = resolver.metadata().await.unwrap();
        assert!(metadata.file.is_none());
    }

    #[tokio::test]
    async fn test_latest_requests_configured_url() {
        let mock = MockHttpClient::new(Ok(br#"{"date":"2020-01-01 00:00:00"}"#.to_vec()));
        let resolver = LatestResolver::new(mock.clone()).with_url("http://mirror/latest.json");

        resolver.latest().await.unwrap();

        assert_eq!(mock.requested(), vec!["http://mirror/latest.json".to_string()]);
    }

    #[tokio::test]
    async fn test_latest_invalid_json() {
        let err = resolver("not json").latest().await.unwrap_err();
        assert!(matches!(err, LatestError::Json(_)));
    }

    #[tokio::test]
    async fn test_latest_invalid_date() {
        let err = resolver(r#"{"date":"05/11/2023 14:20"}"#)
            .latest()
            .await
            .unwrap_err();
        assert!(matches!(err, LatestError::TimeParse { ref value, .. } if value == "05/11/2023 14:20"));
    }

    #[tokio::test]
    async fn test_latest_fetch_failure() {
        let status = FetchError::Status {
            status: 503,
            url: DEFAULT_LATEST_URL.to_string(),
        };
        let resolver = LatestResolver::new(MockHttpClient::new(Err(status.clone())));

        assert_eq!(resolver.latest().await, Err(LatestError::Fetch(status)));
    }

    #[test]
    fn test_parse_timestamp_rejects_trailing_garbage() {
        assert!(parse_timestamp("2023-11-05 14:20:00Z").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
