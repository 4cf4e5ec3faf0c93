//! Request and outcome types for comment generation.

use crate::style::{Style, DEFAULT_SUBJECT};
use serde::{Serialize, Serializer};

/// Error text returned when no API key is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "API Key 未配置";

/// Error text returned when every attempt ended in a transport fault.
pub const UNAVAILABLE_MESSAGE: &str = "AI 评语生成暂时不可用，请稍后重试，或手动填写评语。";

/// Placeholder for a failed reply that carried no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "未知错误";

/// A request to comment on one calligraphy image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    /// Image reference: local path, `file://`, `http(s)://`, `oss://` or `data:` URL
    pub image: String,
    /// Name the comment addresses
    pub subject: String,
    /// Comment tone
    pub style: Style,
}

impl CommentRequest {
    /// Create a request with the default subject and style.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            style: Style::default(),
        }
    }

    /// Set the subject name. Blank names keep the default placeholder.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        if !subject.trim().is_empty() {
            self.subject = subject;
        }
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the style by name; unknown names fall back to professional.
    pub fn style_name(self, name: &str) -> Self {
        self.style(Style::from_name(name))
    }

    /// Prompt text sent alongside the image.
    pub fn prompt(&self) -> String {
        self.style.prompt(&self.subject)
    }
}

/// Why a generation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No credential configured; no request was sent
    Configuration,
    /// The service answered with a non-success status on the last attempt
    RemoteService,
    /// The last attempt failed before a usable reply arrived
    Transport,
}

/// Result of a comment generation: either a comment or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Generated {
        comment: String,
        /// Duration of the successful attempt only
        elapsed_ms: u64,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl CommentOutcome {
    pub(crate) fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        CommentOutcome::Failed {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommentOutcome::Generated { .. })
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            CommentOutcome::Generated { comment, .. } => Some(comment),
            CommentOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CommentOutcome::Generated { .. } => None,
            CommentOutcome::Failed { message, .. } => Some(message),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            CommentOutcome::Generated { .. } => None,
            CommentOutcome::Failed { kind, .. } => Some(*kind),
        }
    }

    /// Elapsed milliseconds; always 0 for failures.
    pub fn elapsed_ms(&self) -> u64 {
        match self {
            CommentOutcome::Generated { elapsed_ms, .. } => *elapsed_ms,
            CommentOutcome::Failed { .. } => 0,
        }
    }

    /// Split into the `(comment, error, elapsed_ms)` triple.
    pub fn into_parts(self) -> (Option<String>, Option<String>, u64) {
        match self {
            CommentOutcome::Generated {
                comment,
                elapsed_ms,
            } => (Some(comment), None, elapsed_ms),
            CommentOutcome::Failed { message, .. } => (None, Some(message), 0),
        }
    }
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    comment: Option<&'a str>,
    error: Option<&'a str>,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureKind>,
}

impl Serialize for CommentOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeRecord {
            comment: self.comment(),
            error: self.error(),
            elapsed_ms: self.elapsed_ms(),
            failure: self.failure_kind(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = CommentRequest::new("work.jpg");
        assert_eq!(request.subject, DEFAULT_SUBJECT);
        assert_eq!(request.style, Style::Professional);
    }

    #[test]
    fn test_blank_subject_keeps_placeholder() {
        let request = CommentRequest::new("work.jpg").subject("   ");
        assert_eq!(request.subject, DEFAULT_SUBJECT);
        let request = CommentRequest::new("work.jpg").subject("李华");
        assert_eq!(request.subject, "李华");
    }

    #[test]
    fn test_style_name_fallback_builds_professional_prompt() {
        let odd = CommentRequest::new("a.jpg").subject("李华").style_name("poetic");
        let pro = CommentRequest::new("a.jpg").subject("李华").style(Style::Professional);
        assert_eq!(odd.prompt(), pro.prompt());
    }

    #[test]
    fn test_success_parts() {
        let outcome = CommentOutcome::Generated {
            comment: "Great brushwork!".to_string(),
            elapsed_ms: 812,
        };
        assert!(outcome.is_success());
        assert_eq!(
            outcome.into_parts(),
            (Some("Great brushwork!".to_string()), None, 812)
        );
    }

    #[test]
    fn test_failure_parts_have_zero_elapsed() {
        let outcome = CommentOutcome::failed(FailureKind::Transport, UNAVAILABLE_MESSAGE);
        assert_eq!(outcome.elapsed_ms(), 0);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
        assert_eq!(
            outcome.into_parts(),
            (None, Some(UNAVAILABLE_MESSAGE.to_string()), 0)
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let ok = CommentOutcome::Generated {
            comment: "好".to_string(),
            elapsed_ms: 5,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["comment"], "好");
        assert!(json["error"].is_null());
        assert!(json.get("failure").is_none());

        let err = CommentOutcome::failed(FailureKind::Configuration, MISSING_API_KEY_MESSAGE);
        let json = serde_json::to_value(&err).unwrap();
        assert!(json["comment"].is_null());
        assert_eq!(json["error"], MISSING_API_KEY_MESSAGE);
        assert_eq!(json["elapsed_ms"], 0);
        assert_eq!(json["failure"], "configuration");
    }
}
