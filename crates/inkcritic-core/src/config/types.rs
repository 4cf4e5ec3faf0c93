//! Sub-configuration structs with their defaults.

use crate::llm::retry::Backoff;
use crate::style::{Style, DEFAULT_SUBJECT};
use serde::{Deserialize, Serialize};

/// Model service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider: "dashscope" (native API) or "openai" (Chat Completions compatible)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Endpoint override; the provider default is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-attempt transport timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "dashscope".to_string(),
            model: "qwen-vl-max".to_string(),
            api_key: "${DASHSCOPE_API_KEY}".to_string(),
            endpoint: None,
            timeout_ms: 60_000,
        }
    }
}

/// Retry settings for failed attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per comment, including the first
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    pub delay_ms: u64,

    /// "constant" or "exponential"
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            backoff: Backoff::Constant,
        }
    }
}

/// Defaults applied when a request leaves fields out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    pub default_subject: String,
    pub default_style: Style,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            default_subject: DEFAULT_SUBJECT.to_string(),
            default_style: Style::Professional,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
