//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to rate replies, teach the bot and drive training without
//! sending a chat message.

use crate::types::{MAX_RATING, MIN_RATING};

/// Separator between the input and the taught response in `/teach`.
const TEACH_SEPARATOR: &str = "=>";

/// A parsed chat command.
///
/// These commands control the session and are never sent as chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Rate the last reply as helpful.
    Good,

    /// Rate the last reply as needing improvement.
    Bad,

    /// Rate the last reply on the 1-5 scale.
    Rate(u8),

    /// Teach the bot a response.  Either side may be empty; the session
    /// reports missing fields.
    Teach { input: String, response: String },

    /// Retrain the backend model.
    Retrain,

    /// Export the training data on the backend.
    Export,

    /// Display training statistics.
    Stats,

    /// Clear the conversation history.
    Clear,

    /// Send the n-th (1-based) suggestion of the latest reply.
    Suggest(usize),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use chatterbox::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/rate 4").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "good" | "+" => ChatCommand::Good,
        "bad" | "-" => ChatCommand::Bad,
        "rate" => match argument {
            Some(arg) => match arg.parse::<u8>() {
                Ok(value) if (MIN_RATING..=MAX_RATING).contains(&value) => ChatCommand::Rate(value),
                _ => ChatCommand::Invalid(format!(
                    "/rate expects an integer between {MIN_RATING} and {MAX_RATING}"
                )),
            },
            None => ChatCommand::Invalid("/rate requires a value".to_string()),
        },
        "teach" => parse_teach(argument.unwrap_or_default()),
        "retrain" | "train" => ChatCommand::Retrain,
        "export" => ChatCommand::Export,
        "stats" | "status" => ChatCommand::Stats,
        "clear" => ChatCommand::Clear,
        "suggest" => match argument {
            Some(arg) => match arg.parse::<usize>() {
                Ok(value) if value > 0 => ChatCommand::Suggest(value),
                _ => ChatCommand::Invalid("/suggest expects a positive integer".to_string()),
            },
            None => ChatCommand::Invalid("/suggest requires a number".to_string()),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_teach(argument: &str) -> ChatCommand {
    let (input, response) = match argument.split_once(TEACH_SEPARATOR) {
        Some((input, response)) => (input.trim(), response.trim()),
        None => (argument.trim(), ""),
    };
    ChatCommand::Teach {
        input: input.to_string(),
        response: response.to_string(),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /good                  Mark the last reply as helpful
  /bad                   Mark the last reply as needing improvement
  /rate <1-5>            Rate the last reply
  /teach <input> => <response>
                         Teach the bot how to answer an input
  /retrain               Retrain the model from collected feedback
  /export                Export training data on the server
  /stats                 Show training statistics
  /suggest <n>           Send the n-th suggestion of the latest reply
  /clear                 Clear conversation history
  /help                  Show this help message
  /quit                  Exit the chat"#
}
