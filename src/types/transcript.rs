use crate::types::Message;

/// The ordered, append-only sequence of rendered messages.
///
/// A transcript may start with pinned messages (the welcome banner) that
/// survive [`Transcript::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
    pinned: usize,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript whose first message is kept across clears.
    pub fn with_welcome(welcome: Message) -> Self {
        Self {
            messages: vec![welcome],
            pinned: 1,
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop every message except the pinned welcome.
    pub fn clear(&mut self) {
        self.messages.truncate(self.pinned);
    }

    /// Messages that survive a clear.
    pub fn pinned(&self) -> &[Message] {
        &self.messages[..self.pinned.min(self.messages.len())]
    }

    /// All messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate over messages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages, pinned ones included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the transcript holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_welcome() {
        let mut transcript = Transcript::with_welcome(Message::bot("Welcome!", "09:00"));
        transcript.push(Message::user("hi", "09:01"));
        transcript.push(Message::bot("hello", "09:01"));
        assert_eq!(transcript.len(), 3);

        transcript.clear();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content(), "Welcome!");
    }

    #[test]
    fn clear_without_welcome_empties() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi", "09:01"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }
}
