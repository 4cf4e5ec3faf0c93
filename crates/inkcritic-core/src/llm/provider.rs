//! Vision provider trait and request/reply types.
//!
//! Defines the interface every multimodal backend implements, the shared
//! reply shape the comment generator interprets, and the factory that builds
//! a provider from config.

use crate::config::LlmConfig;
use crate::error::{ConfigError, FaultKind, ProviderFault};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Reference prefixes the service fetches by itself.
const REMOTE_PREFIXES: [&str; 4] = ["http://", "https://", "oss://", "data:"];

/// Image data ready to put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// URL the service downloads itself
    Remote(String),
    /// Base64-encoded local file
    Encoded {
        /// Base64-encoded image bytes
        data: String,
        /// MIME type (e.g., "image/jpeg", "image/png")
        media_type: String,
    },
}

impl ImageInput {
    /// Turn an image reference into wire data.
    ///
    /// URLs pass through untouched. Anything else is read as a local file
    /// (`file://` prefix and `~` are accepted).
    pub async fn resolve(reference: &str) -> Result<Self, ProviderFault> {
        if REMOTE_PREFIXES.iter().any(|p| reference.starts_with(p)) {
            return Ok(ImageInput::Remote(reference.to_string()));
        }

        let raw = reference.strip_prefix("file://").unwrap_or(reference);
        let path = PathBuf::from(shellexpand::tilde(raw).into_owned());
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            ProviderFault::new(
                FaultKind::Image,
                format!("Failed to read image {}: {e}", path.display()),
            )
        })?;

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Ok(Self::from_bytes(&bytes, &format))
    }

    /// Create an encoded input from raw bytes and a format string
    /// (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        ImageInput::Encoded {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// URL form: the URL itself, or a data URL for local files.
    pub fn to_url(&self) -> String {
        match self {
            ImageInput::Remote(url) => url.clone(),
            ImageInput::Encoded { data, media_type } => {
                format!("data:{media_type};base64,{data}")
            }
        }
    }
}

/// One multimodal conversation turn: an image plus the prompt text.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Image reference, resolved by the provider
    pub image: String,
    /// Prompt text
    pub prompt: String,
}

/// A typed block in a list-shaped message content.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

impl ContentBlock {
    /// Typed blocks count as text when their type is "text"; untyped blocks
    /// count when they carry a `text` field.
    fn is_text(&self) -> bool {
        match self.kind.as_deref() {
            Some(kind) => kind == "text",
            None => self.text.is_some(),
        }
    }
}

/// Assistant message content: a plain string or a list of blocks.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Comment text: the string itself, or the first text block's text.
    /// Yields an empty string when no text block exists.
    pub fn extract_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .find(|block| block.is_text())
                .and_then(|block| block.text.clone())
                .unwrap_or_default(),
        }
    }
}

/// A well-formed reply from the service, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionReply {
    /// HTTP status code
    pub status_code: u16,
    /// Human-readable message supplied by the service, if any
    pub message: Option<String>,
    /// First choice's message content, if any
    pub content: Option<MessageContent>,
}

impl VisionReply {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// Extracted comment text; missing content reads as empty.
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(MessageContent::extract_text)
            .unwrap_or_default()
    }
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionProvider>` for dynamic dispatch).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "dashscope").
    fn name(&self) -> &str;

    /// Whether a credential is configured.
    async fn is_available(&self) -> bool;

    /// Send one conversation turn.
    ///
    /// Any response the service sends back is an `Ok` reply, whatever its
    /// status. `Err` is reserved for faults where no usable reply exists.
    async fn converse(&self, request: &VisionRequest) -> Result<VisionReply, ProviderFault>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    let resolved = if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()?
    } else {
        value.to_string()
    };
    if resolved.trim().is_empty() {
        None
    } else {
        Some(resolved)
    }
}

/// Factory that creates the configured provider.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from the `[llm]` config section.
    ///
    /// A missing API key is not an error here; the provider reports itself
    /// unavailable and the generator answers with a configuration failure.
    pub fn create(config: &LlmConfig) -> Result<Box<dyn VisionProvider>, ConfigError> {
        let api_key = resolve_env_var(&config.api_key);
        let timeout = Duration::from_millis(config.timeout_ms);
        match config.provider.as_str() {
            "dashscope" => {
                let endpoint = config
                    .endpoint
                    .as_deref()
                    .unwrap_or(super::dashscope::DEFAULT_ENDPOINT);
                Ok(Box::new(super::dashscope::DashScopeProvider::new(
                    endpoint,
                    api_key,
                    &config.model,
                    timeout,
                )))
            }
            "openai" => {
                let endpoint = config
                    .endpoint
                    .as_deref()
                    .unwrap_or(super::openai::DEFAULT_ENDPOINT);
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    endpoint,
                    api_key,
                    &config.model,
                    timeout,
                )))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown LLM provider: {other}"
            ))),
        }
    }
}
