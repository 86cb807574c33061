use serde::{Deserialize, Serialize};

/// Body returned by `POST /feedback`.
///
/// Backends answer either `{"success": true}` or
/// `{"status": "success", "message": "..."}`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Explicit success flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Status word: `success`, `info` or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FeedbackResponse {
    /// True when the backend recorded the feedback.
    pub fn is_success(&self) -> bool {
        match self.success {
            Some(success) => success,
            None => self.status.as_deref() == Some("success"),
        }
    }
}
