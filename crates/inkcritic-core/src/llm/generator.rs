//! Comment generation with bounded retries.
//!
//! One call runs a sequential attempt loop against a single provider. Only the
//! last attempt's outcome is visible to the caller; earlier failures show up
//! in the logs and as added latency.

use super::provider::{ProviderFactory, VisionProvider, VisionRequest};
use super::retry::RetryPolicy;
use crate::config::Config;
use crate::error::ConfigError;
use crate::types::{
    CommentOutcome, CommentRequest, FailureKind, MISSING_API_KEY_MESSAGE, UNAVAILABLE_MESSAGE,
    UNKNOWN_ERROR_MESSAGE,
};
use std::sync::Arc;
use std::time::Instant;

/// Generates calligraphy comments through a vision provider.
#[derive(Clone)]
pub struct CommentGenerator {
    provider: Arc<dyn VisionProvider>,
    policy: RetryPolicy,
}

impl CommentGenerator {
    pub fn new(provider: Box<dyn VisionProvider>, policy: RetryPolicy) -> Self {
        Self {
            provider: Arc::from(provider),
            policy,
        }
    }

    /// Build the configured provider and retry policy.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let provider = ProviderFactory::create(&config.llm)?;
        Ok(Self::new(provider, config.retry_policy()))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate a comment for one image.
    ///
    /// Never returns an error: a missing API key, a non-success reply and a
    /// transport fault all come back as [`CommentOutcome::Failed`]. Remote
    /// messages are passed on; transport fault details are only logged.
    pub async fn generate(&self, request: &CommentRequest) -> CommentOutcome {
        if !self.provider.is_available().await {
            tracing::error!(
                "API key is not configured for provider '{}'",
                self.provider.name()
            );
            return CommentOutcome::failed(FailureKind::Configuration, MISSING_API_KEY_MESSAGE);
        }

        let vision_request = VisionRequest {
            image: request.image.clone(),
            prompt: request.prompt(),
        };

        for attempt in 1..=self.policy.max_attempts {
            if attempt == 1 {
                tracing::info!(
                    "Requesting comment for {} from {} (style: {})",
                    request.subject,
                    self.provider.name(),
                    request.style
                );
            } else {
                tracing::info!(
                    "Retry {}/{} calling {}",
                    attempt - 1,
                    self.policy.max_attempts - 1,
                    self.provider.name()
                );
            }

            let start = Instant::now();
            match self.provider.converse(&vision_request).await {
                Ok(reply) if reply.is_ok() => {
                    let comment = reply.text();
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    tracing::info!(
                        "Comment generated in {elapsed_ms}ms (style: {})",
                        request.style
                    );
                    return CommentOutcome::Generated {
                        comment,
                        elapsed_ms,
                    };
                }
                Ok(reply) => {
                    let message = reply
                        .message
                        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
                    tracing::warn!(
                        "{} call failed (HTTP {}): {message}",
                        self.provider.name(),
                        reply.status_code
                    );
                    if self.policy.has_attempts_left(attempt) {
                        self.wait_after(attempt).await;
                        continue;
                    }
                    return CommentOutcome::failed(
                        FailureKind::RemoteService,
                        format!("AI 调用失败: {message}"),
                    );
                }
                Err(fault) => {
                    tracing::warn!(
                        "{} call raised {}: {}",
                        self.provider.name(),
                        fault.kind,
                        fault.message
                    );
                    if self.policy.has_attempts_left(attempt) {
                        self.wait_after(attempt).await;
                        continue;
                    }
                    return CommentOutcome::failed(FailureKind::Transport, UNAVAILABLE_MESSAGE);
                }
            }
        }

        // Only reachable with a zero attempt budget.
        CommentOutcome::failed(FailureKind::Transport, UNAVAILABLE_MESSAGE)
    }

    async fn wait_after(&self, attempt: u32) {
        let delay = self.policy.delay_after(attempt);
        tracing::info!("Retrying in {delay:?}");
        tokio::time::sleep(delay).await;
    }
}
