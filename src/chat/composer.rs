//! Draft input state: the message being composed and the teach form.

/// Longest message the composer accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Counts above this are shown as a warning.
pub const WARNING_CHARS: usize = 400;

/// Counts above this are shown as critical.
pub const CRITICAL_CHARS: usize = 450;

/// Severity of the character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharLevel {
    Normal,
    Warning,
    Critical,
}

/// Character counter for the current draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub level: CharLevel,
}

impl CharCount {
    /// Classify a character count.
    pub fn new(count: usize) -> Self {
        let level = if count > CRITICAL_CHARS {
            CharLevel::Critical
        } else if count > WARNING_CHARS {
            CharLevel::Warning
        } else {
            CharLevel::Normal
        };
        Self { count, level }
    }

    /// True if the draft is longer than [`MAX_MESSAGE_CHARS`].
    pub fn is_over_limit(&self) -> bool {
        self.count > MAX_MESSAGE_CHARS
    }
}

/// Input fields owned by the session: the chat draft plus the two teach fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    draft: String,
    teach_input: String,
    teach_response: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The draft message.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft, truncating it to [`MAX_MESSAGE_CHARS`].
    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.chars().take(MAX_MESSAGE_CHARS).collect();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Counter for the current draft.
    pub fn char_count(&self) -> CharCount {
        CharCount::new(self.draft.chars().count())
    }

    /// The teach form's input and response fields.
    pub fn teach_fields(&self) -> (&str, &str) {
        (&self.teach_input, &self.teach_response)
    }

    pub fn set_teach_fields(&mut self, input: &str, response: &str) {
        self.teach_input = input.to_string();
        self.teach_response = response.to_string();
    }

    pub fn clear_teach_fields(&mut self) {
        self.teach_input.clear();
        self.teach_response.clear();
    }
}
