//! OpenAI-compatible provider using the Chat Completions API.
//!
//! Defaults to DashScope's compatible-mode endpoint, but works against any
//! Chat Completions server that accepts `image_url` content parts.

use super::provider::{ImageInput, MessageContent, VisionProvider, VisionReply, VisionRequest};
use crate::error::{FaultKind, ProviderFault};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Chat Completions provider.
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// `endpoint` is the API base; `/chat/completions` is appended.
    pub fn new(endpoint: &str, api_key: Option<String>, model: &str, timeout: Duration) -> Self {
        Self {
            api_key,
            model: model.to_string(),
            client: reqwest::Client::new(),
            url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
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

/// Error bodies come either nested (`{"error": {...}}`) or flat.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error
            .and_then(|e| e.message)
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn converse(&self, request: &VisionRequest) -> Result<VisionReply, ProviderFault> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let image = ImageInput::resolve(&request.image).await?;

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_url(),
                        },
                    },
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ProviderFault::from_reqwest("OpenAI", &e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ProviderFault::from_reqwest("OpenAI", &e))?;

        if !status.is_success() {
            return Ok(VisionReply {
                status_code: status.as_u16(),
                message: serde_json::from_str::<ErrorBody>(&text)
                    .ok()
                    .and_then(ErrorBody::into_message),
                content: None,
            });
        }

        let chat: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderFault::new(
                FaultKind::Decode,
                format!("Failed to parse OpenAI response: {e}"),
            )
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                ProviderFault::new(FaultKind::Decode, "OpenAI returned empty choices array")
            })?
            .message
            .content;

        Ok(VisionReply {
            status_code: status.as_u16(),
            message: None,
            content,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;

    fn provider(server: &mockito::Server) -> OpenAiProvider {
        OpenAiProvider::new(
            &format!("{}/v1/", server.url()),
            Some("sk-test".to_string()),
            "qwen-vl-plus",
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_local_image_sent_as_data_url() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(serde_json::json!({
                "model": "qwen-vl-plus",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AQID"}},
                        {"type": "text", "text": "点评"}
                    ]
                }]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Great brushwork!"}}]}"#)
            .create_async()
            .await;

        let request = VisionRequest {
            image: file.path().to_string_lossy().into_owned(),
            prompt: "点评".to_string(),
        };
        let reply = provider(&server).converse(&request).await.unwrap();

        mock.assert_async().await;
        assert!(reply.is_ok());
        assert_eq!(reply.text(), "Great brushwork!");
    }

    #[tokio::test]
    async fn test_nested_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#)
            .create_async()
            .await;

        let request = VisionRequest {
            image: "https://cdn.example.com/a.jpg".to_string(),
            prompt: "点评".to_string(),
        };
        let reply = provider(&server).converse(&request).await.unwrap();

        assert_eq!(reply.status_code, 401);
        assert_eq!(reply.message.as_deref(), Some("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_flat_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body(r#"{"message":"internal error"}"#)
            .create_async()
            .await;

        let request = VisionRequest {
            image: "https://cdn.example.com/a.jpg".to_string(),
            prompt: "点评".to_string(),
        };
        let reply = provider(&server).converse(&request).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("internal error"));
    }

    #[tokio::test]
    async fn test_block_content_reply() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"content":[{"type":"image_url"},{"type":"text","text":"章法得当"}]}}]}"#,
            )
            .create_async()
            .await;

        let request = VisionRequest {
            image: "https://cdn.example.com/a.jpg".to_string(),
            prompt: "点评".to_string(),
        };
        let reply = provider(&server).converse(&request).await.unwrap();
        assert_eq!(reply.text(), "章法得当");
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let request = VisionRequest {
            image: "/nonexistent/ghost.jpg".to_string(),
            prompt: "点评".to_string(),
        };
        let fault = provider(&server).converse(&request).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(fault.kind, FaultKind::Image);
    }
}
