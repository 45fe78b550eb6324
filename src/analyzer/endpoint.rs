use super::request::AnalysisRequest;
use crate::error::Result;
use async_trait::async_trait;

/// Multimodal completion service
///
/// Returns the raw text of the first completion, or an empty string when
/// the service answered without one. Network and HTTP failures are
/// `Transport`.
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String>;
}
