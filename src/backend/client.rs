//! HTTP client for the earnings-analysis backend.
//!
//! Request/response only: no retry, no cancellation. Every failure is
//! terminal for the attempt and surfaced as a `BackendError`; the user
//! re-runs the command to retry.

use crate::models::{AnalysisData, ApiResponse, ApiStatus};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Fallback message when the backend reports an error without one.
const GENERIC_FAILURE: &str = "The backend reported a failure without details";

/// Terminal failure classes for a backend request.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No response at all: connection refused, DNS failure, reset.
    #[error("failed to connect to backend at {url}; is it running?")]
    Connect { url: String },

    /// The request outlived the configured client timeout.
    #[error("backend request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Non-success HTTP status outside the envelope protocol.
    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Application-level failure (`status: "error"` in the envelope).
    /// The message is taken verbatim from the response.
    #[error("{message}")]
    Api { message: String },

    /// The response body could not be decoded as the expected JSON.
    #[error("failed to decode backend response")]
    Decode(#[source] reqwest::Error),

    /// Any other transport-level failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// Request body for `/api/analyze` and `/api/collect-data`.
#[derive(Debug, Clone, Serialize)]
struct AnalysisRequest {
    ticker: String,
    quarters: usize,
    use_cache: bool,
}

/// Client for the five backend endpoints.
pub struct BackendClient {
    base_url: String,
    use_cache: bool,
    timeout_seconds: u64,
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str, timeout_seconds: u64, use_cache: bool) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(BackendError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            use_cache,
            timeout_seconds,
            http,
        })
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request_body(&self, ticker: &str, quarters: usize) -> AnalysisRequest {
        AnalysisRequest {
            ticker: ticker.to_string(),
            quarters,
            use_cache: self.use_cache,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else if e.is_connect() {
            BackendError::Connect {
                url: self.base_url.clone(),
            }
        } else {
            BackendError::Transport(e)
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn post_envelope(
        &self,
        path: &str,
        body: Option<&AnalysisRequest>,
    ) -> Result<ApiResponse, BackendError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;

        let envelope: ApiResponse = response.json().await.map_err(BackendError::Decode)?;
        unwrap_envelope(envelope)
    }

    /// `POST /api/analyze`: run (or fetch cached) analysis for a ticker.
    ///
    /// Returns the analysis snapshot and whether it came from the backend
    /// cache.
    pub async fn analyze(
        &self,
        ticker: &str,
        quarters: usize,
    ) -> Result<(AnalysisData, bool), BackendError> {
        info!("Requesting analysis for {} ({} quarters)", ticker, quarters);

        let envelope = self
            .post_envelope("/api/analyze", Some(&self.request_body(ticker, quarters)))
            .await?;

        let from_cache = envelope.from_cache.unwrap_or(false);
        match envelope.data {
            Some(data) => Ok((data, from_cache)),
            // Success envelope without data is still a failed fetch
            None => Err(BackendError::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to fetch analysis".to_string()),
            }),
        }
    }

    /// `POST /api/collect-data`: trigger transcript collection.
    ///
    /// Returns the backend's outcome message.
    pub async fn collect_data(
        &self,
        ticker: &str,
        quarters: usize,
    ) -> Result<String, BackendError> {
        info!("Requesting collection for {} ({} quarters)", ticker, quarters);

        let envelope = self
            .post_envelope(
                "/api/collect-data",
                Some(&self.request_body(ticker, quarters)),
            )
            .await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Data collected successfully".to_string()))
    }

    /// `GET /api/transcripts/{ticker}?quarters=N`: raw transcript payload.
    ///
    /// The shape is not specified, so it is passed through as JSON.
    pub async fn transcripts(&self, ticker: &str, quarters: usize) -> Result<Value, BackendError> {
        let url = self.endpoint(&format!("/api/transcripts/{}", ticker));
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("quarters", quarters)])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(BackendError::Decode)
    }

    /// `POST /api/clear-cache`: drop all cached backend results.
    pub async fn clear_cache(&self) -> Result<String, BackendError> {
        info!("Clearing backend cache");

        let envelope = self.post_envelope("/api/clear-cache", None).await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Cache cleared".to_string()))
    }

    /// `GET /api/health`: backend liveness payload.
    pub async fn health(&self) -> Result<Value, BackendError> {
        let url = self.endpoint("/api/health");
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(BackendError::Decode)
    }
}

/// Turn an error envelope into a `BackendError`, verbatim message first.
fn unwrap_envelope(envelope: ApiResponse) -> Result<ApiResponse, BackendError> {
    match envelope.status {
        ApiStatus::Success => Ok(envelope),
        ApiStatus::Error => Err(BackendError::Api {
            message: envelope
                .message
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        }),
    }
}
