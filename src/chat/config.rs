//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling session behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

/// Welcome banner pinned to the top of the transcript.
pub const DEFAULT_WELCOME: &str =
    "Hello! I'm your AI assistant. Ask me anything, or type /help to see what else I can do.";

/// Name the bot uses for itself in notifications.
pub const DEFAULT_BOT_NAME: &str = "AI-BD";

/// Command-line arguments for the chatterbox-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: $CHATTERBOX_BASE_URL or http://127.0.0.1:5000/)", "URL")]
    pub base_url: Option<String>,

    /// Transport timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Artificial pause before showing a reply.
    #[arrrg(optional, "Minimum thinking delay in milliseconds; up to the same again is added at random", "MS")]
    pub thinking_delay_ms: Option<u64>,

    /// Append every backend exchange to this file.
    #[arrrg(optional, "Log backend requests and responses to FILE", "FILE")]
    pub log_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Start without the welcome banner.
    #[arrrg(flag, "Do not show the welcome message")]
    pub no_welcome: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base URL; `None` defers to the environment and the built-in default.
    pub base_url: Option<String>,

    /// Transport timeout; `None` uses the client default.
    pub timeout: Option<Duration>,

    /// Minimum artificial delay before a reply is shown.
    pub thinking_delay: Duration,

    /// Upper bound of the random extra delay added to `thinking_delay`.
    pub thinking_jitter: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Welcome banner, if any.
    pub welcome_message: Option<String>,

    /// Name used in "learned new response" notifications.
    pub bot_name: String,

    /// Where to log backend exchanges.
    pub log_file: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment, else `http://127.0.0.1:5000/`
    /// - Thinking delay: none
    /// - Color: enabled
    /// - Welcome message: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            thinking_delay: Duration::ZERO,
            thinking_jitter: Duration::ZERO,
            use_color: true,
            welcome_message: Some(DEFAULT_WELCOME.to_string()),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            log_file: None,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the thinking delay and its random jitter.
    pub fn with_thinking_delay(mut self, delay: Duration, jitter: Duration) -> Self {
        self.thinking_delay = delay;
        self.thinking_jitter = jitter;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets or clears the welcome banner.
    pub fn with_welcome(mut self, welcome: Option<String>) -> Self {
        self.welcome_message = welcome;
        self
    }

    /// Sets the bot's display name.
    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = name.into();
        self
    }

    /// Sets the exchange log file.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let delay = args
            .thinking_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(Duration::ZERO);
        let welcome = if args.no_welcome {
            None
        } else {
            Some(DEFAULT_WELCOME.to_string())
        };

        ChatConfig {
            base_url: args.base_url,
            timeout: args.timeout_secs.map(Duration::from_secs),
            thinking_delay: delay,
            thinking_jitter: delay,
            use_color: !args.no_color,
            welcome_message: welcome,
            log_file: args.log_file.map(PathBuf::from),
            ..ChatConfig::new()
        }
    }
}
