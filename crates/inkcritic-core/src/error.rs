//! Error types for inkcritic.
//!
//! `generate` itself never returns an error: every failure inside the retry
//! loop is folded into a [`CommentOutcome`](crate::CommentOutcome). The types
//! here cover what happens around it: loading configuration, building a
//! provider, and the per-attempt faults a provider reports.

use std::fmt;
use thiserror::Error;

/// Top-level error type for inkcritic setup operations.
#[derive(Error, Debug)]
pub enum InkcriticError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Category of a fault raised while talking to the model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Connection, DNS or TLS failure while sending the request
    Request,
    /// The transport timed out before a response arrived
    Timeout,
    /// The image reference could not be turned into request data
    Image,
    /// The response body did not have the expected shape
    Decode,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::Request => "RequestError",
            FaultKind::Timeout => "TimeoutError",
            FaultKind::Image => "ImageError",
            FaultKind::Decode => "DecodeError",
        };
        f.write_str(name)
    }
}

/// A fault during a single attempt, as opposed to a well-formed
/// non-success reply from the service.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct ProviderFault {
    pub kind: FaultKind,
    pub message: String,
}

impl ProviderFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a reqwest error raised while sending or reading a response.
    pub(crate) fn from_reqwest(provider: &str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FaultKind::Timeout
        } else if err.is_decode() {
            FaultKind::Decode
        } else {
            FaultKind::Request
        };
        Self::new(kind, format!("{provider} request failed: {err}"))
    }
}

/// Convenience type alias for inkcritic results.
pub type Result<T> = std::result::Result<T, InkcriticError>;
