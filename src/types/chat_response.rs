use serde::{Deserialize, Serialize};

/// Body returned by `POST /chat`.
///
/// Only `response` is required.  The backend may add a display timestamp and
/// report whether its training features are switched on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The bot's reply, with lightweight inline markup.
    pub response: String,

    /// Display timestamp chosen by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Whether feedback can be recorded for this exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_enabled: Option<bool>,
}

impl ChatResponse {
    /// Create a response carrying only reply text.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            timestamp: None,
            training_enabled: None,
        }
    }

    /// Set the server timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the training flag.
    pub fn with_training_enabled(mut self, enabled: bool) -> Self {
        self.training_enabled = Some(enabled);
        self
    }
}
