//! Output rendering for the chat session.
//!
//! The session controller never prints.  Everything the user sees goes
//! through a [`Renderer`]: transcript messages, the typing indicator, control
//! state and transient notifications.  [`PlainTextRenderer`] is the terminal
//! implementation with optional ANSI styling.

use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::format::Inline;
use crate::types::{Message, Notification, NotificationLevel, Sender, StatsDisplay};

/// ANSI escape code for bold text (used for `**strong**` spans).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for timestamps and the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for `*emphasis*` spans).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for code spans and info notices).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for successes).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for magenta text (used for suggestions).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// Carriage return plus erase-line, used to remove the typing indicator.
const ANSI_ERASE_LINE: &str = "\r\x1b[2K";

/// A user-facing control whose enabled state the controller manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Sending a chat message.
    Send,
    /// Retraining the backend model.
    Retrain,
}

/// Trait for rendering session output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording renderers in tests
pub trait Renderer: Send {
    /// Show a message that was just appended to the transcript.
    fn render_message(&mut self, message: &Message);

    /// Show or hide the "bot is typing" indicator.
    fn show_typing(&mut self, typing: bool);

    /// Show a transient, non-blocking notification.
    fn notify(&mut self, notification: &Notification);

    /// Reflect a control being enabled or disabled.
    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        _ = control;
        _ = enabled;
    }

    /// Called after the transcript was cleared back to its welcome message.
    fn transcript_cleared(&mut self) {}

    /// Called whenever the training statistics display changes.
    fn update_stats(&mut self, stats: &StatsDisplay) {
        _ = stats;
    }

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer writes to stdout by default; tests hand it a `Vec<u8>`.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    echo_user: bool,
    typing: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer over an arbitrary writer.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            echo_user: true,
            typing: false,
        }
    }

    /// Whether user messages are printed.  Interactive front-ends that already
    /// echo the input line turn this off.
    pub fn with_echo_user(mut self, echo_user: bool) -> Self {
        self.echo_user = echo_user;
        self
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }

    fn styled(&mut self, style: &str, text: &str) {
        if self.use_color {
            let styled = format!("{style}{text}{ANSI_RESET}");
            self.write(&styled);
        } else {
            self.write(text);
        }
    }

    /// Flushes the writer to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn clear_typing(&mut self) {
        if self.typing {
            if self.use_color {
                self.write(ANSI_ERASE_LINE);
            }
            self.typing = false;
        }
    }

    fn write_inlines(&mut self, inlines: &[Inline], indent: &str) {
        for inline in inlines {
            match inline {
                Inline::Text(text) => self.write(text),
                Inline::Strong(children) => {
                    self.open_style(ANSI_BOLD);
                    self.write_inlines(children, indent);
                    self.close_style();
                }
                Inline::Emphasis(children) => {
                    self.open_style(ANSI_ITALIC);
                    self.write_inlines(children, indent);
                    self.close_style();
                }
                Inline::Code(code) => self.styled(ANSI_CYAN, code),
                Inline::LineBreak => {
                    let line = format!("\n{indent}");
                    self.write(&line);
                }
            }
        }
    }

    fn open_style(&mut self, style: &str) {
        if self.use_color {
            self.write(style);
        }
    }

    // A reset also ends any enclosing span's style.
    fn close_style(&mut self) {
        if self.use_color {
            self.write(ANSI_RESET);
        }
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn render_message(&mut self, message: &Message) {
        self.clear_typing();
        if message.sender() == Sender::User && !self.echo_user {
            return;
        }
        let stamp = format!("[{}] ", message.timestamp());
        self.styled(ANSI_DIM, &stamp);
        let label = format!("{}: ", message.sender().label());
        self.styled(ANSI_BOLD, &label);
        let indent = " ".repeat(stamp.len() + label.len());
        self.write_inlines(message.rendering().inlines(), &indent);
        self.write("\n");

        if !message.suggestions().is_empty() {
            let line = format!("{indent}Try: ");
            self.write(&line);
            let suggestions = message
                .suggestions()
                .iter()
                .enumerate()
                .map(|(idx, suggestion)| format!("[{}] {}", idx + 1, suggestion))
                .collect::<Vec<_>>()
                .join("  ");
            self.styled(ANSI_MAGENTA, &suggestions);
            self.write("\n");
        }
        if message.has_feedback_prompt() {
            let line = format!("{indent}Was this helpful? /good or /bad\n");
            self.styled(ANSI_DIM, &line);
        }
        self.flush();
    }

    fn show_typing(&mut self, typing: bool) {
        if typing {
            if !self.typing && self.use_color {
                self.styled(ANSI_DIM, "Bot is typing...");
            }
            self.typing = true;
        } else {
            self.clear_typing();
        }
        self.flush();
    }

    fn notify(&mut self, notification: &Notification) {
        self.clear_typing();
        let style = match notification.level {
            NotificationLevel::Info => ANSI_CYAN,
            NotificationLevel::Success => ANSI_GREEN,
            NotificationLevel::Warning => ANSI_YELLOW,
            NotificationLevel::Error => ANSI_RED,
        };
        let line = format!("* {}", notification.text);
        self.styled(style, &line);
        self.write("\n");
        self.flush();
    }

    fn transcript_cleared(&mut self) {
        self.print_info("Conversation cleared.");
    }

    fn print_error(&mut self, error: &str) {
        self.clear_typing();
        let line = format!("Error: {error}");
        self.styled(ANSI_RED, &line);
        self.write("\n");
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.clear_typing();
        self.write(info);
        self.write("\n");
        self.flush();
    }
}

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Message(Message),
    Typing(bool),
    Notification(Notification),
    Control(Control, bool),
    Cleared,
    Stats(StatsDisplay),
    Error(String),
    Info(String),
}

/// Renderer that records every call instead of drawing.
///
/// Clones share the same log, so a caller can keep one handle and give the
/// other to the session.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.lock().clone()
    }

    /// Messages rendered so far.
    pub fn messages(&self) -> Vec<Message> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Message(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Notifications shown so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Notification(notification) => Some(notification.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn record(&self, event: RenderEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RenderEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Renderer for RecordingRenderer {
    fn render_message(&mut self, message: &Message) {
        self.record(RenderEvent::Message(message.clone()));
    }

    fn show_typing(&mut self, typing: bool) {
        self.record(RenderEvent::Typing(typing));
    }

    fn notify(&mut self, notification: &Notification) {
        self.record(RenderEvent::Notification(notification.clone()));
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        self.record(RenderEvent::Control(control, enabled));
    }

    fn transcript_cleared(&mut self) {
        self.record(RenderEvent::Cleared);
    }

    fn update_stats(&mut self, stats: &StatsDisplay) {
        self.record(RenderEvent::Stats(stats.clone()));
    }

    fn print_error(&mut self, error: &str) {
        self.record(RenderEvent::Error(error.to_string()));
    }

    fn print_info(&mut self, info: &str) {
        self.record(RenderEvent::Info(info.to_string()));
    }
}
