//! Food analysis client
//!
//! One `analyze` call is one request to the inference endpoint, bounded by
//! a timeout. The reply is fence-stripped, parsed and validated; the report
//! is returned exactly as the model reported it.

mod endpoint;
mod openai;
pub mod pending;
mod request;

pub use endpoint::InferenceEndpoint;
pub use food_scanner_common::AnalysisReport;
pub use openai::OpenAiEndpoint;
pub use pending::PendingCapture;
pub use request::AnalysisRequest;

use crate::capture::ImagePayload;
use crate::error::{Result, ScannerError};
use food_scanner_common::parse_report;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Relative gap between reported totals and item sums that gets logged
const TOTALS_DIVERGENCE_WARN: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            max_tokens: 2000,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct FoodAnalyzer {
    endpoint: Arc<dyn InferenceEndpoint>,
    settings: AnalysisSettings,
}

impl FoodAnalyzer {
    pub fn new(endpoint: Arc<dyn InferenceEndpoint>, settings: AnalysisSettings) -> Self {
        Self { endpoint, settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analyze one meal photo
    ///
    /// # Errors
    /// * `Transport` - the endpoint could not be reached or answered non-2xx
    /// * `AnalysisTimeout` - no answer within the configured timeout
    /// * `AnalysisParse` - empty reply, not JSON, or not a valid report
    pub async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisReport> {
        if payload.is_empty() {
            return Err(ScannerError::UnreadableFile("empty image payload".into()));
        }

        let request = AnalysisRequest::new(payload, &self.settings);
        debug!(
            digest = %payload.digest(),
            bytes = payload.len() as u64,
            source = %payload.source,
            "sending image for analysis"
        );
        let started = Instant::now();

        let response =
            match tokio::time::timeout(self.settings.timeout, self.endpoint.complete(&request)).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!(category = e.category(), error = %e, "analysis request failed");
                    return Err(e);
                }
                Err(_) => {
                    warn!(timeout = ?self.settings.timeout, "analysis request timed out");
                    return Err(ScannerError::AnalysisTimeout(self.settings.timeout));
                }
            };

        let report = parse_report(&response).map_err(|e| {
            // Contract drift with the endpoint, not a network problem
            error!(
                category = "analysis_parse",
                error = %e,
                response_chars = response.len() as u64,
                "analysis response did not match the report contract"
            );
            ScannerError::AnalysisParse(e.to_string())
        })?;

        let divergence = report.total_divergence();
        if divergence > TOTALS_DIVERGENCE_WARN {
            warn!(
                divergence = %format!("{:.0}%", divergence * 100.0),
                "reported totals differ from the sum of the items"
            );
        }

        info!(
            items = report.items.len() as u64,
            balance = %report.summary.balance,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );
        Ok(report)
    }
}
