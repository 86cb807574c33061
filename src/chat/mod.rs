//! Chat session module for conversations with a trainable chatbot backend.
//!
//! This module provides the session controller and the pieces a front-end
//! needs around it:
//!
//! - Sending messages with a single in-flight request at a time
//! - Rating replies and teaching new responses
//! - Retraining, exporting and displaying training statistics
//! - Slash commands for the terminal front-end
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The session controller and its outcomes
//! - [`commands`]: Slash command parsing and handling
//! - [`composer`]: Draft message, teach fields and character counter
//! - [`suggestions`]: Quick replies offered under the first bot reply

pub mod commands;
pub mod composer;
pub mod config;
pub mod session;
pub mod suggestions;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use composer::{CharCount, CharLevel, Composer, MAX_MESSAGE_CHARS};
pub use config::{ChatArgs, ChatConfig};
pub use session::{
    APOLOGY, ChatSessionController, ExportOutcome, FeedbackOutcome, HELPFUL_RATING, Outcome,
    Rejection, RetrainOutcome, SessionState, SessionSummary, SubmitOutcome, TeachOutcome,
    UNHELPFUL_RATING,
};
