//! Result persistence
//!
//! The driver hands every record to a [`ResultSink`]. Sinks may fail; the
//! driver logs and carries on.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use swaggerdrill_core::TestResult;

pub trait ResultSink {
    fn save(&self, result: &TestResult) -> impl Future<Output = Result<(), StoreError>>;
}

/// `None` persists nothing.
impl<S: ResultSink> ResultSink for Option<S> {
    async fn save(&self, result: &TestResult) -> Result<(), StoreError> {
        match self {
            Some(sink) => sink.save(result).await,
            None => Ok(()),
        }
    }
}

/// REST result store: `POST`/`GET {base}/test-results`.
#[derive(Debug, Clone)]
pub struct HttpResultStore {
    client: reqwest::Client,
    base_url: String,
}

/// `GET /test-results` answers either a bare array or a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryPayload {
    List(Vec<TestResult>),
    Page { results: Vec<TestResult> },
}

impl HttpResultStore {
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn collection_url(&self) -> String {
        format!("{}/test-results", self.base_url)
    }

    /// Stored results, oldest first as the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-2xx status or an unrecognized body.
    pub async fn history(&self) -> Result<Vec<TestResult>, StoreError> {
        let resp = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        decode_history(&body)
    }
}

impl ResultSink for HttpResultStore {
    async fn save(&self, result: &TestResult) -> Result<(), StoreError> {
        let resp = self
            .client
            .post(self.collection_url())
            .json(result)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Status(status.as_u16()))
        }
    }
}

fn decode_history(body: &str) -> Result<Vec<TestResult>, StoreError> {
    match serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))? {
        HistoryPayload::List(results) | HistoryPayload::Page { results } => Ok(results),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Request(String),
    #[error("Store responded with HTTP {0}")]
    Status(u16),
    #[error("Unrecognized store response: {0}")]
    Decode(String),
}
