//! Quick-reply suggestions offered under the first replies of a conversation.

use rand::Rng;
use rand::seq::SliceRandom;

/// The pool suggestions are drawn from.
pub const SUGGESTIONS: [&str; 5] = [
    "What's the weather like?",
    "Tell me a fun fact",
    "Help me with programming",
    "What can you do?",
    "Tell me about yourself",
];

/// How many suggestions a reply carries.
pub const SUGGESTIONS_PER_REPLY: usize = 3;

/// Replies are decorated while the session's message count is at most this.
pub const SUGGESTION_MESSAGE_LIMIT: usize = 2;

/// Draw `count` distinct suggestions in random order.
pub fn pick_suggestions<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    SUGGESTIONS
        .choose_multiple(rng, count)
        .map(|suggestion| suggestion.to_string())
        .collect()
}
