use serde::{Deserialize, Serialize};

/// Lowest rating accepted by `POST /feedback`.
pub const MIN_RATING: u8 = 1;

/// Highest rating accepted by `POST /feedback`.
pub const MAX_RATING: u8 = 5;

/// Free-text label sent alongside a rating.
///
/// The backend counts `Taught` entries as positive training examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLabel {
    /// Rating of four or more.
    Positive,
    /// Rating below four.
    NeedsImprovement,
    /// A response supplied by the user through the teach form.
    Taught,
}

impl FeedbackLabel {
    /// Derive the label for a thumbs-up/thumbs-down style rating.
    pub fn for_rating(rating: u8) -> Self {
        if rating >= 4 {
            FeedbackLabel::Positive
        } else {
            FeedbackLabel::NeedsImprovement
        }
    }

    /// The wire string for this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackLabel::Positive => "Positive feedback",
            FeedbackLabel::NeedsImprovement => "Needs improvement",
            FeedbackLabel::Taught => "User taught response",
        }
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// The user half of the exchange.
    pub user_input: String,
    /// The bot half of the exchange.
    pub bot_response: String,
    /// Rating in `1..=5`.
    pub rating: u8,
    /// Label string, see [`FeedbackLabel`].
    pub feedback: String,
}

impl FeedbackRequest {
    /// Feedback on a completed exchange.  The rating is clamped to `1..=5`.
    pub fn rated(user_input: impl Into<String>, bot_response: impl Into<String>, rating: u8) -> Self {
        let rating = rating.clamp(MIN_RATING, MAX_RATING);
        Self {
            user_input: user_input.into(),
            bot_response: bot_response.into(),
            rating,
            feedback: FeedbackLabel::for_rating(rating).as_str().to_string(),
        }
    }

    /// A user-taught pair, always sent with the maximal rating.
    pub fn taught(user_input: impl Into<String>, bot_response: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            bot_response: bot_response.into(),
            rating: MAX_RATING,
            feedback: FeedbackLabel::Taught.as_str().to_string(),
        }
    }
}
