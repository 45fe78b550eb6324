//! OpenAI-compatible chat completions endpoint
//!
//! Sends the system prompt as a `system` message and the user prompt plus
//! the image as a two-part `user` message.

use super::endpoint::InferenceEndpoint;
use super::request::AnalysisRequest;
use crate::error::{Result, ScannerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const ERROR_BODY_PREVIEW: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_body(request: &AnalysisRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        messages: vec![
            Message {
                role: "system",
                content: MessageContent::Text(request.system_prompt),
            },
            Message {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: request.user_prompt,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: &request.image_url,
                        },
                    },
                ]),
            },
        ],
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

pub struct OpenAiEndpoint {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl OpenAiEndpoint {
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ScannerError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: format!("{}/{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH),
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceEndpoint for OpenAiEndpoint {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String> {
        let body = build_body(request);
        debug!(url = %self.url, model = %request.model, "sending completion request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScannerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
            warn!(%status, body = %preview, "inference endpoint returned an error status");
            return Err(ScannerError::Transport(format!("HTTP {}", status)));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScannerError::AnalysisParse(format!("completion envelope: {}", e)))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        debug!(chars = content.len() as u64, "completion received");
        Ok(content)
    }
}
