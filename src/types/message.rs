use serde::{Deserialize, Serialize};

use crate::format::{Rendering, render_markup};
use crate::types::Sender;

/// One entry in the transcript.
///
/// Messages are immutable once constructed; the transcript only hands out
/// shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    content: String,
    sender: Sender,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
    #[serde(default)]
    feedback_prompt: bool,
}

impl Message {
    /// Create a message.
    pub fn new(content: impl Into<String>, sender: Sender, timestamp: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp: timestamp.into(),
            suggestions: Vec::new(),
            feedback_prompt: false,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(content, Sender::User, timestamp)
    }

    /// Create a bot message.
    pub fn bot(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot, timestamp)
    }

    /// Attach follow-up suggestions.
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Ask the user whether this reply was helpful.
    pub fn with_feedback_prompt(mut self, prompt: bool) -> Self {
        self.feedback_prompt = prompt;
        self
    }

    /// The raw content, markup included.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Who wrote the message.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Display timestamp.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Suggestions offered beneath the message.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Whether the message carries a "was this helpful?" prompt.
    pub fn has_feedback_prompt(&self) -> bool {
        self.feedback_prompt
    }

    /// The formatted content.
    pub fn rendering(&self) -> Rendering {
        render_markup(&self.content)
    }
}
