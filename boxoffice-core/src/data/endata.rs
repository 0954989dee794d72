//! Endata ranking service provider.
//!
//! One form-encoded POST per run against the mainland box-office ranking
//! endpoint. The interesting part of the response lives at `data.table0`.
//! There is no retry: a timeout or non-2xx status aborts the run.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::provider::{RankingProvider, SourceError};
use crate::schema::RawRecord;

pub const DEFAULT_ENDPOINT: &str = "https://ys.endata.cn/enlib-api/api/home/getrank_mainland.do";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";

/// Transport settings for the ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub accept: String,
    /// Form fields, sent in this order.
    pub payload: Vec<(String, String)>,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            payload: vec![
                ("r".to_string(), "0.9936776079863086".to_string()),
                ("top".to_string(), "50".to_string()),
                ("type".to_string(), "0".to_string()),
            ],
            timeout_secs: 20,
        }
    }
}

/// Blocking provider for the ranking service.
///
/// The HTTP client is built per fetch; a run makes exactly one request.
pub struct EndataProvider {
    config: FetchConfig,
}

impl EndataProvider {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn build_client(&self) -> Result<reqwest::blocking::Client, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|e| SourceError::Fetch(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&self.config.accept)
                .map_err(|e| SourceError::Fetch(format!("invalid accept header: {e}")))?,
        );

        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::Fetch(format!("failed to build HTTP client: {e}")))
    }
}

impl Default for EndataProvider {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl RankingProvider for EndataProvider {
    fn name(&self) -> &str {
        "endata"
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
        log::info!("requesting ranking from {}", self.config.endpoint);

        let client = self.build_client()?;
        let resp = client
            .post(&self.config.endpoint)
            .form(&self.config.payload)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Fetch(format!(
                        "request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    SourceError::Fetch(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Fetch(format!("HTTP {status}")));
        }

        let body: Value = resp
            .json()
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))?;

        extract_table(&body)
    }
}

/// Pull the ranking entries out of `data.table0`.
///
/// A missing `data`, a missing or null `table0`, or an empty array are all
/// reported as `EmptyDataset`. Entries that are not JSON objects are dropped.
pub fn extract_table(body: &Value) -> Result<Vec<RawRecord>, SourceError> {
    let entries = body
        .get("data")
        .and_then(|d| d.get("table0"))
        .and_then(Value::as_array)
        .ok_or(SourceError::EmptyDataset)?;

    let records: Vec<RawRecord> = entries
        .iter()
        .filter_map(|e| e.as_object().cloned())
        .collect();

    if records.len() < entries.len() {
        log::warn!(
            "dropped {} non-object entries from table0",
            entries.len() - records.len()
        );
    }

    if records.is_empty() {
        return Err(SourceError::EmptyDataset);
    }
    Ok(records)
}
