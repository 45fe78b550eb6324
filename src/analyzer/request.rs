use super::AnalysisSettings;
use crate::capture::ImagePayload;
use food_scanner_common::{SYSTEM_PROMPT, USER_PROMPT};

/// One analysis attempt: fixed instructions plus the image
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub model: String,
    pub system_prompt: &'static str,
    pub user_prompt: &'static str,
    /// `data:<mime>;base64,...`
    pub image_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl AnalysisRequest {
    pub fn new(payload: &ImagePayload, settings: &AnalysisSettings) -> Self {
        Self {
            model: settings.model.clone(),
            system_prompt: SYSTEM_PROMPT,
            user_prompt: USER_PROMPT,
            image_url: payload.to_data_url(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}
