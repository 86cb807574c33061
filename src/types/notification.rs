/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Neutral information.
    Info,
    /// An operation completed.
    Success,
    /// The user must fix something before retrying.
    Warning,
    /// An operation failed.
    Error,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text to show.
    pub text: String,
}

impl Notification {
    /// Create a notification.
    pub fn new(level: NotificationLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Create an info notification.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, text)
    }

    /// Create a success notification.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, text)
    }

    /// Create a warning notification.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, text)
    }

    /// Create an error notification.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, text)
    }
}
