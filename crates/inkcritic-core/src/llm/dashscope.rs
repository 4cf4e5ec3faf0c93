//! DashScope provider using the native multimodal-generation API.
//!
//! Sends the image reference and prompt as content parts of a single user
//! message. Error bodies carry `code` and `message` at the top level.

use super::provider::{ImageInput, MessageContent, VisionProvider, VisionReply, VisionRequest};
use crate::error::{FaultKind, ProviderFault};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(crate) const DEFAULT_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";

/// DashScope provider for Qwen-VL models.
pub struct DashScopeProvider {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl DashScopeProvider {
    pub fn new(endpoint: &str, api_key: Option<String>, model: &str, timeout: Duration) -> Self {
        Self {
            api_key,
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerationRequest {
    model: String,
    input: GenerationInput,
}

#[derive(Serialize)]
struct GenerationInput {
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ContentPart {
    Image { image: String },
    Text { text: String },
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerationResponse {
    output: Output,
    message: Option<String>,
}

#[derive(Deserialize)]
struct Output {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<MessageContent>,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl VisionProvider for DashScopeProvider {
    fn name(&self) -> &str {
        "dashscope"
    }

    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn converse(&self, request: &VisionRequest) -> Result<VisionReply, ProviderFault> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let image = ImageInput::resolve(&request.image).await?;

        let body = GenerationRequest {
            model: self.model.clone(),
            input: GenerationInput {
                messages: vec![Message {
                    role: "user".to_string(),
                    content: vec![
                        ContentPart::Image {
                            image: image.to_url(),
                        },
                        ContentPart::Text {
                            text: request.prompt.clone(),
                        },
                    ],
                }],
            },
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ProviderFault::from_reqwest("DashScope", &e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ProviderFault::from_reqwest("DashScope", &e))?;

        if !status.is_success() {
            let error: Option<ErrorBody> = serde_json::from_str(&text).ok();
            if let Some(ErrorBody {
                code: Some(code), ..
            }) = &error
            {
                tracing::debug!("DashScope error code {code} (HTTP {status})");
            }
            return Ok(VisionReply {
                status_code: status.as_u16(),
                message: error
                    .and_then(|e| e.message)
                    .filter(|m| !m.trim().is_empty()),
                content: None,
            });
        }

        let generation: GenerationResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderFault::new(
                FaultKind::Decode,
                format!("Failed to parse DashScope response: {e}"),
            )
        })?;

        let content = generation
            .output
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                ProviderFault::new(
                    FaultKind::Decode,
                    "DashScope returned empty choices array",
                )
            })?
            .message
            .content;

        Ok(VisionReply {
            status_code: status.as_u16(),
            message: generation.message,
            content,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
