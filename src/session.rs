//! Dashboard session state.
//!
//! A `DashboardSession` is the single owner of client-side state: the
//! latest successful analysis snapshot, the last collection outcome
//! message, and the last error. Operations run one at a time; a new
//! snapshot always replaces the previous one wholesale.

use crate::backend::{BackendClient, BackendError};
use crate::models::AnalysisData;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct DashboardSession {
    snapshot: Option<AnalysisData>,
    collect_message: Option<String>,
    last_error: Option<String>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest successful analysis snapshot, if any.
    pub fn snapshot(&self) -> Option<&AnalysisData> {
        self.snapshot.as_ref()
    }

    /// Outcome message from the last collection request.
    #[allow(dead_code)] // Utility accessor
    pub fn collect_message(&self) -> Option<&str> {
        self.collect_message.as_deref()
    }

    /// Error from the last failed operation.
    #[allow(dead_code)] // Utility accessor
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch analysis and replace the snapshot on success.
    ///
    /// Returns whether the backend served the result from its cache.
    pub async fn analyze(
        &mut self,
        client: &BackendClient,
        ticker: &str,
        quarters: usize,
    ) -> Result<bool, BackendError> {
        self.last_error = None;

        match client.analyze(ticker, quarters).await {
            Ok((data, from_cache)) => {
                self.record_snapshot(data);
                Ok(from_cache)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Trigger transcript collection and record the outcome message.
    pub async fn collect(
        &mut self,
        client: &BackendClient,
        ticker: &str,
        quarters: usize,
    ) -> Result<String, BackendError> {
        self.last_error = None;
        self.collect_message = None;

        match client.collect_data(ticker, quarters).await {
            Ok(message) => {
                self.collect_message = Some(message.clone());
                Ok(message)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Clear the backend cache and drop all local state.
    pub async fn clear_cache(&mut self, client: &BackendClient) -> Result<String, BackendError> {
        match client.clear_cache().await {
            Ok(message) => {
                self.reset();
                Ok(message)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    fn record_snapshot(&mut self, data: AnalysisData) {
        info!(
            "Replacing snapshot: {} over {} quarters",
            data.ticker, data.quarters_analyzed
        );
        // Wholesale replacement, never merged
        self.snapshot = Some(data);
    }

    fn record_failure(&mut self, error: &BackendError) {
        warn!("Operation failed: {}", error);
        self.last_error = Some(error.to_string());
    }

    /// Drop the snapshot and any stale messages.
    fn reset(&mut self) {
        self.snapshot = None;
        self.collect_message = None;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiResponse;

    const FIXTURE: &str = include_str!("../fixtures/analysis_nvda.json");

    fn fixture_data() -> AnalysisData {
        let response: ApiResponse = serde_json::from_str(FIXTURE).unwrap();
        response.data.unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = DashboardSession::new();
        assert!(session.snapshot().is_none());
        assert!(session.collect_message().is_none());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_snapshot_is_replaced_wholesale() {
        let mut session = DashboardSession::new();

        let mut first = fixture_data();
        first.ticker = "AMD".to_string();
        session.record_snapshot(first);
        assert_eq!(session.snapshot().unwrap().ticker, "AMD");

        let second = fixture_data();
        session.record_snapshot(second);
        assert_eq!(session.snapshot().unwrap().ticker, "NVDA");
    }

    #[test]
    fn test_failure_recorded_without_touching_snapshot() {
        let mut session = DashboardSession::new();
        session.record_snapshot(fixture_data());

        let err = BackendError::Connect {
            url: "http://localhost:5000".to_string(),
        };
        session.record_failure(&err);

        assert!(session.last_error().unwrap().contains("failed to connect"));
        assert!(session.snapshot().is_some());
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut session = DashboardSession::new();
        session.record_snapshot(fixture_data());
        session.collect_message = Some("collected".to_string());
        session.last_error = Some("stale".to_string());

        session.reset();

        assert!(session.snapshot().is_none());
        assert!(session.collect_message().is_none());
        assert!(session.last_error().is_none());
    }
}
