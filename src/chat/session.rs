//! Core chat session management.
//!
//! This module provides [`ChatSessionController`], which owns the
//! conversation (transcript, last exchange, training flag and statistics
//! display) and drives every backend request the user can trigger.
//!
//! All operations take `&self`.  Session state sits behind a mutex that is
//! never held across an await, so a second call issued while a request is in
//! flight sees the pending state and is rejected instead of blocking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::backend::ChatBackend;
use crate::chat::composer::{CharCount, Composer};
use crate::chat::config::ChatConfig;
use crate::chat::suggestions::{SUGGESTION_MESSAGE_LIMIT, SUGGESTIONS_PER_REPLY, pick_suggestions};
use crate::client::BackendClient;
use crate::client_logger::FileLogger;
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_APOLOGIES, SESSION_EXCHANGE_DURATION, SESSION_FEEDBACK_SENT, SESSION_REJECTED_SUBMITS,
    SESSION_RETRAINS, SESSION_STATS_REFRESH_FAILURES, SESSION_SUBMITS,
};
use crate::render::{Control, Renderer};
use crate::types::{
    ChatRequest, FeedbackRequest, Message, Notification, Sender, StatsDisplay, Transcript,
};
use crate::utils::time::local_display_time;

/// Bot message shown in place of a reply when the chat request fails.
pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment! 🔄";

/// Rating sent for a thumbs-up.
pub const HELPFUL_RATING: u8 = 5;

/// Rating sent for a thumbs-down.
pub const UNHELPFUL_RATING: u8 = 1;

/// Mutable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// True while a chat request is in flight.
    pub is_awaiting_response: bool,
    /// User half of the most recently completed exchange.
    pub last_user_message: Option<String>,
    /// Bot half of the most recently completed exchange.
    pub last_bot_response: Option<String>,
    /// Whether the backend accepts feedback.
    pub training_enabled: bool,
    /// Messages appended since the session started or was last cleared.
    pub message_count: usize,
}

impl SessionState {
    /// The most recently completed exchange, if any.
    pub fn last_exchange(&self) -> Option<(&str, &str)> {
        match (&self.last_user_message, &self.last_bot_response) {
            (Some(user), Some(bot)) => Some((user, bot)),
            _ => None,
        }
    }
}

/// Why an operation was refused before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The message was empty after trimming.
    Empty,
    /// A teach field was empty after trimming.
    MissingFields,
    /// The same operation is already in flight.
    Busy,
    /// The backend has not enabled training.
    TrainingDisabled,
    /// No exchange has completed yet.
    NoExchange,
    /// The session was disposed.
    Disposed,
}

impl Rejection {
    /// The error this rejection corresponds to.
    pub fn error(&self) -> Error {
        match self {
            Rejection::Empty => Error::validation("message is empty", Some("message".to_string())),
            Rejection::MissingFields => Error::validation(
                "both the input and the response are required",
                Some("teach".to_string()),
            ),
            Rejection::Busy => Error::invalid_state("a request is already in flight"),
            Rejection::TrainingDisabled => Error::invalid_state("training is not enabled"),
            Rejection::NoExchange => Error::invalid_state("no completed exchange to rate"),
            Rejection::Disposed => Error::invalid_state("session has been disposed"),
        }
    }
}

/// Result of [`ChatSessionController::submit`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The bot replied.
    Answered,
    /// The request failed and the apology was shown instead.
    Apologized(Error),
    /// Nothing was sent.
    Rejected(Rejection),
}

impl SubmitOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, SubmitOutcome::Answered)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

/// Result of a training operation.
#[derive(Debug, Clone)]
pub enum Outcome<T = ()> {
    /// The backend reported success.
    Done(T),
    /// The backend answered but declined, with its message if any.
    Refused(Option<String>),
    /// The request failed.
    Failed(Error),
    /// Nothing was sent.
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// The error behind a failure or rejection.
    pub fn error(&self) -> Option<Error> {
        match self {
            Outcome::Failed(err) => Some(err.clone()),
            Outcome::Rejected(rejection) => Some(rejection.error()),
            Outcome::Done(_) | Outcome::Refused(_) => None,
        }
    }
}

pub type FeedbackOutcome = Outcome;
pub type TeachOutcome = Outcome;
pub type RetrainOutcome = Outcome;
/// On success, carries the export filename.
pub type ExportOutcome = Outcome<String>;

/// What remains of a session after [`ChatSessionController::dispose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub state: SessionState,
    pub transcript: Transcript,
}

struct Inner {
    state: SessionState,
    transcript: Transcript,
    composer: Composer,
    stats: StatsDisplay,
    retraining: bool,
    disposed: bool,
    renderer: Box<dyn Renderer>,
}

impl Inner {
    fn push(&mut self, message: Message) {
        self.state.message_count += 1;
        self.renderer.render_message(&message);
        self.transcript.push(message);
    }

    fn notify(&mut self, notification: Notification) {
        self.renderer.notify(&notification);
    }
}

/// `delay` plus a random extra of at most `jitter`, saturating at `Duration::MAX`.
fn thinking_delay<R: Rng + ?Sized>(delay: Duration, jitter: Duration, rng: &mut R) -> Duration {
    let jitter_ms = u64::try_from(jitter.as_millis()).unwrap_or(u64::MAX);
    if jitter_ms == 0 {
        return delay;
    }
    delay.saturating_add(Duration::from_millis(rng.gen_range(0..=jitter_ms)))
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds a control disabled until dropped.
///
/// Dropping the guard re-enables the control on every exit path, including
/// when the owning future is dropped mid-request.
struct ControlGuard<'a> {
    inner: &'a Mutex<Inner>,
    control: Control,
}

impl<'a> ControlGuard<'a> {
    fn acquire(inner: &'a Mutex<Inner>, control: Control) -> std::result::Result<Self, Rejection> {
        let mut guard = lock(inner);
        if guard.disposed {
            return Err(Rejection::Disposed);
        }
        let busy = match control {
            Control::Send => &mut guard.state.is_awaiting_response,
            Control::Retrain => &mut guard.retraining,
        };
        if *busy {
            return Err(Rejection::Busy);
        }
        *busy = true;
        guard.renderer.set_control_enabled(control, false);
        Ok(Self { inner, control })
    }
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        let mut guard = lock(self.inner);
        match self.control {
            Control::Send => {
                guard.state.is_awaiting_response = false;
                guard.renderer.show_typing(false);
            }
            Control::Retrain => guard.retraining = false,
        }
        guard.renderer.set_control_enabled(self.control, true);
    }
}

/// Controller for one chat session.
///
/// Share it behind an `Arc` with whatever drives the UI.  Call
/// [`init`](Self::init) once before use and [`dispose`](Self::dispose) when
/// done.
pub struct ChatSessionController<B: ChatBackend> {
    backend: B,
    config: ChatConfig,
    inner: Mutex<Inner>,
}

impl ChatSessionController<BackendClient> {
    /// Creates a controller talking HTTP to the backend `config` names.
    pub fn connect(config: ChatConfig, renderer: Box<dyn Renderer>) -> Result<Self> {
        let mut client = BackendClient::with_options(config.base_url.clone(), config.timeout)?;
        if let Some(path) = &config.log_file {
            client = client.with_logger(Arc::new(FileLogger::open(path)?));
        }
        Ok(Self::new(client, config, renderer))
    }
}

impl<B: ChatBackend> ChatSessionController<B> {
    /// Creates a controller over any backend.
    pub fn new(backend: B, config: ChatConfig, renderer: Box<dyn Renderer>) -> Self {
        let transcript = match &config.welcome_message {
            Some(welcome) => {
                Transcript::with_welcome(Message::bot(welcome.as_str(), local_display_time()))
            }
            None => Transcript::new(),
        };
        let inner = Inner {
            state: SessionState::default(),
            transcript,
            composer: Composer::new(),
            stats: StatsDisplay::default(),
            retraining: false,
            disposed: false,
            renderer,
        };
        Self {
            backend,
            config,
            inner: Mutex::new(inner),
        }
    }

    /// The backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    fn notify(&self, notification: Notification) {
        self.lock().notify(notification);
    }

    /// Shows the welcome message and loads the training statistics.
    pub async fn init(&self) {
        {
            let mut inner = self.lock();
            if inner.disposed {
                return;
            }
            let Inner {
                transcript,
                renderer,
                stats,
                ..
            } = &mut *inner;
            for message in transcript.pinned() {
                renderer.render_message(message);
            }
            renderer.update_stats(stats);
        }
        self.refresh_stats().await;
    }

    /// Detaches the session.  Every later operation is rejected.
    pub fn dispose(&self) -> SessionSummary {
        let mut inner = self.lock();
        inner.disposed = true;
        SessionSummary {
            state: inner.state.clone(),
            transcript: std::mem::take(&mut inner.transcript),
        }
    }

    /// Sends a message and waits for the reply.
    ///
    /// Empty input, or input arriving while another reply is pending, is
    /// rejected without touching the transcript.  A failed request leaves the
    /// apology in the transcript; nothing is retried.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let message = text.trim();
        if message.is_empty() {
            SESSION_REJECTED_SUBMITS.click();
            return SubmitOutcome::Rejected(Rejection::Empty);
        }
        let gate = match ControlGuard::acquire(&self.inner, Control::Send) {
            Ok(gate) => gate,
            Err(rejection) => {
                SESSION_REJECTED_SUBMITS.click();
                return SubmitOutcome::Rejected(rejection);
            }
        };
        {
            let mut inner = self.lock();
            inner.push(Message::user(message, local_display_time()));
            inner.composer.clear_draft();
            inner.renderer.show_typing(true);
        }

        SESSION_SUBMITS.click();
        let start = Instant::now();
        let outcome = match self.backend.chat(&ChatRequest::new(message)).await {
            Ok(response) => {
                self.thinking_pause().await;
                let mut inner = self.lock();
                // A reply without the flag disables training.
                inner.state.training_enabled = response.training_enabled.unwrap_or(false);
                let suggestions = if inner.state.message_count < SUGGESTION_MESSAGE_LIMIT {
                    // The reply itself is about to be counted.
                    pick_suggestions(&mut rand::thread_rng(), SUGGESTIONS_PER_REPLY)
                } else {
                    Vec::new()
                };
                let timestamp = response.timestamp.unwrap_or_else(local_display_time);
                let reply = Message::bot(response.response.as_str(), timestamp)
                    .with_suggestions(suggestions)
                    .with_feedback_prompt(inner.state.training_enabled);
                inner.state.last_user_message = Some(message.to_string());
                inner.state.last_bot_response = Some(response.response);
                inner.push(reply);
                SubmitOutcome::Answered
            }
            Err(err) => {
                SESSION_APOLOGIES.click();
                self.lock().push(Message::bot(APOLOGY, local_display_time()));
                SubmitOutcome::Apologized(err)
            }
        };
        SESSION_EXCHANGE_DURATION.add(start.elapsed().as_secs_f64());
        drop(gate);
        outcome
    }

    /// Submits whatever the composer's draft holds.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let draft = self.lock().composer.draft().to_string();
        self.submit(&draft).await
    }

    /// Puts a suggestion in the draft and submits it.
    pub async fn send_suggestion(&self, suggestion: &str) -> SubmitOutcome {
        self.set_draft(suggestion);
        self.submit_draft().await
    }

    async fn thinking_pause(&self) {
        let delay = thinking_delay(
            self.config.thinking_delay,
            self.config.thinking_jitter,
            &mut rand::thread_rng(),
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Rates the most recent exchange.  Ratings are clamped to 1..=5.
    ///
    /// Nothing is sent unless training is enabled and an exchange has
    /// completed.
    pub async fn record_feedback(&self, rating: u8) -> FeedbackOutcome {
        let request = {
            let inner = self.lock();
            if inner.disposed {
                return Outcome::Rejected(Rejection::Disposed);
            }
            if !inner.state.training_enabled {
                return Outcome::Rejected(Rejection::TrainingDisabled);
            }
            let Some((user, bot)) = inner.state.last_exchange() else {
                return Outcome::Rejected(Rejection::NoExchange);
            };
            FeedbackRequest::rated(user, bot, rating)
        };

        match self.backend.feedback(&request).await {
            Ok(response) if response.is_success() => {
                SESSION_FEEDBACK_SENT.click();
                self.notify(Notification::success("Thanks for your feedback! 🎯"));
                self.refresh_stats().await;
                Outcome::Done(())
            }
            Ok(response) => {
                if let Some(message) = &response.message {
                    self.notify(Notification::warning(format!("⚠️ {message}")));
                }
                Outcome::Refused(response.message)
            }
            Err(err) => {
                self.notify(Notification::error("❌ Feedback failed"));
                Outcome::Failed(err)
            }
        }
    }

    /// Reloads the training statistics.
    ///
    /// Returns false if the report could not be fetched; the displayed
    /// statistics are then left as they were and training is marked
    /// unavailable.
    pub async fn refresh_stats(&self) -> bool {
        if self.is_disposed() {
            return false;
        }
        match self.backend.training_report().await {
            Ok(report) => {
                let display = report
                    .stats
                    .as_ref()
                    .map(StatsDisplay::from)
                    .unwrap_or_default();
                let mut inner = self.lock();
                inner.state.training_enabled = report.available;
                inner.renderer.update_stats(&display);
                inner.stats = display;
                true
            }
            Err(_) => {
                SESSION_STATS_REFRESH_FAILURES.click();
                self.lock().state.training_enabled = false;
                false
            }
        }
    }

    /// Teaches the backend to answer `input` with `response`.
    pub async fn teach(&self, input: &str, response: &str) -> TeachOutcome {
        if self.is_disposed() {
            return Outcome::Rejected(Rejection::Disposed);
        }
        let (input, response) = (input.trim(), response.trim());
        if input.is_empty() || response.is_empty() {
            self.notify(Notification::warning("Please fill in both fields ⚠️"));
            return Outcome::Rejected(Rejection::MissingFields);
        }

        let request = FeedbackRequest::taught(input, response);
        match self.backend.feedback(&request).await {
            Ok(reply) if reply.is_success() => {
                {
                    let mut inner = self.lock();
                    inner.composer.clear_teach_fields();
                    inner.notify(Notification::success(format!(
                        "{} learned new response! 🎓",
                        self.config.bot_name
                    )));
                }
                self.refresh_stats().await;
                Outcome::Done(())
            }
            Ok(reply) => {
                let text = match &reply.message {
                    Some(message) => format!("⚠️ {message}"),
                    None => "❌ Teaching failed".to_string(),
                };
                self.notify(Notification::warning(text));
                Outcome::Refused(reply.message)
            }
            Err(err) => {
                self.notify(Notification::error("❌ Teaching failed"));
                Outcome::Failed(err)
            }
        }
    }

    /// Teaches from the composer's teach fields.
    pub async fn teach_from_composer(&self) -> TeachOutcome {
        let (input, response) = {
            let inner = self.lock();
            let (input, response) = inner.composer.teach_fields();
            (input.to_string(), response.to_string())
        };
        self.teach(&input, &response).await
    }

    /// Asks the backend to retrain its model.
    ///
    /// The retrain control stays disabled until the request settles.
    pub async fn retrain(&self) -> RetrainOutcome {
        let guard = match ControlGuard::acquire(&self.inner, Control::Retrain) {
            Ok(guard) => guard,
            Err(rejection) => return Outcome::Rejected(rejection),
        };
        SESSION_RETRAINS.click();
        let outcome = match self.backend.retrain().await {
            Ok(response) if response.success => {
                self.notify(Notification::success("AI model retrained successfully! 🚀"));
                Outcome::Done(())
            }
            Ok(response) => {
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Retraining failed".to_string());
                self.notify(Notification::warning(format!("⚠️ {message}")));
                Outcome::Refused(response.message)
            }
            Err(err) => {
                self.notify(Notification::error("❌ Training failed"));
                Outcome::Failed(err)
            }
        };
        if outcome.is_done() {
            self.refresh_stats().await;
        }
        drop(guard);
        outcome
    }

    /// Asks the backend to export its training data.
    pub async fn export_training(&self) -> ExportOutcome {
        if self.is_disposed() {
            return Outcome::Rejected(Rejection::Disposed);
        }
        match self.backend.export_training().await {
            Ok(response) if response.success => {
                let filename = response.filename.unwrap_or_default();
                self.notify(Notification::success(format!(
                    "Training data exported to {filename} 💾"
                )));
                Outcome::Done(filename)
            }
            Ok(response) => {
                self.notify(Notification::error("❌ Export failed"));
                Outcome::Refused(response.message)
            }
            Err(err) => {
                self.notify(Notification::error("❌ Export failed"));
                Outcome::Failed(err)
            }
        }
    }

    /// Drops every message except the welcome and restarts the message count.
    ///
    /// The last exchange is kept, so it can still be rated.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        inner.transcript.clear();
        inner.state.message_count = 0;
        inner.renderer.transcript_cleared();
    }

    /// Replaces the composer draft.
    pub fn set_draft(&self, text: &str) {
        self.lock().composer.set_draft(text);
    }

    /// Fills the composer's teach fields.
    pub fn set_teach_fields(&self, input: &str, response: &str) {
        self.lock().composer.set_teach_fields(input, response);
    }

    /// Character counter for the current draft.
    pub fn char_count(&self) -> CharCount {
        self.lock().composer.char_count()
    }

    /// Snapshot of the composer.
    pub fn composer(&self) -> Composer {
        self.lock().composer.clone()
    }

    /// Snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Transcript {
        self.lock().transcript.clone()
    }

    /// The current statistics display.
    pub fn stats_display(&self) -> StatsDisplay {
        self.lock().stats.clone()
    }

    /// Suggestions carried by the latest bot message.
    pub fn latest_suggestions(&self) -> Vec<String> {
        self.lock()
            .transcript
            .iter()
            .rev()
            .find(|message| message.sender() == Sender::Bot)
            .map(|message| message.suggestions().to_vec())
            .unwrap_or_default()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.lock().state.is_awaiting_response
    }

    pub fn training_enabled(&self) -> bool {
        self.lock().state.training_enabled
    }

    /// False while a retrain is running.
    pub fn is_retrain_enabled(&self) -> bool {
        !self.lock().retraining
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Prints an informational line through the session's renderer.
    pub fn print_info(&self, info: &str) {
        self.lock().renderer.print_info(info);
    }

    /// Prints an error line through the session's renderer.
    pub fn print_error(&self, error: &str) {
        self.lock().renderer.print_error(error);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready};

    use super::*;
    use crate::backend::Endpoint;
    use crate::render::{RecordingRenderer, RenderEvent};
    use crate::types::{
        ChatResponse, ExportResponse, FeedbackResponse, MODEL_TRAINED, NotificationLevel,
        RetrainResponse, TrainingReport, TrainingStats,
    };

    /// In-memory backend answering from per-endpoint queues.
    #[derive(Default)]
    struct ScriptedBackend {
        chat: Mutex<VecDeque<Result<ChatResponse>>>,
        feedback: Mutex<VecDeque<Result<FeedbackResponse>>>,
        reports: Mutex<VecDeque<Result<TrainingReport>>>,
        retrain: Mutex<VecDeque<Result<RetrainResponse>>>,
        export: Mutex<VecDeque<Result<ExportResponse>>>,
        calls: Mutex<Vec<Endpoint>>,
        feedback_bodies: Mutex<Vec<FeedbackRequest>>,
        chat_gate: Option<Notify>,
        retrain_gate: Option<Notify>,
    }

    impl ScriptedBackend {
        fn parked_chat() -> Self {
            Self {
                chat_gate: Some(Notify::new()),
                ..Self::default()
            }
        }

        fn parked_retrain() -> Self {
            Self {
                retrain_gate: Some(Notify::new()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Endpoint> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, endpoint: Endpoint) -> usize {
            self.calls().into_iter().filter(|e| *e == endpoint).count()
        }

        fn record(&self, endpoint: Endpoint) {
            self.calls.lock().unwrap().push(endpoint);
        }
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::connection("connection refused", None)))
    }

    #[async_trait::async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat(&self, _: &ChatRequest) -> Result<ChatResponse> {
            self.record(Endpoint::Chat);
            if let Some(gate) = &self.chat_gate {
                gate.notified().await;
            }
            next(&self.chat)
        }

        async fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackResponse> {
            self.record(Endpoint::Feedback);
            self.feedback_bodies.lock().unwrap().push(request.clone());
            next(&self.feedback)
        }

        async fn training_report(&self) -> Result<TrainingReport> {
            self.record(Endpoint::TrainingReport);
            next(&self.reports)
        }

        async fn retrain(&self) -> Result<RetrainResponse> {
            self.record(Endpoint::Retrain);
            if let Some(gate) = &self.retrain_gate {
                gate.notified().await;
            }
            next(&self.retrain)
        }

        async fn export_training(&self) -> Result<ExportResponse> {
            self.record(Endpoint::ExportTraining);
            next(&self.export)
        }
    }

    fn controller(
        backend: ScriptedBackend,
    ) -> (ChatSessionController<Arc<ScriptedBackend>>, Arc<ScriptedBackend>, RecordingRenderer) {
        let backend = Arc::new(backend);
        let recorder = RecordingRenderer::new();
        let controller = ChatSessionController::new(
            Arc::clone(&backend),
            ChatConfig::new(),
            Box::new(recorder.clone()),
        );
        (controller, backend, recorder)
    }

    fn report(available: bool, conversations: u64) -> TrainingReport {
        TrainingReport {
            available,
            stats: Some(TrainingStats {
                total_conversations: conversations,
                positive_feedback: 1,
                learned_patterns: 2,
                ..TrainingStats::default()
            }),
            ..TrainingReport::default()
        }
    }

    fn success() -> FeedbackResponse {
        FeedbackResponse {
            success: Some(true),
            ..FeedbackResponse::default()
        }
    }

    async fn answered_with_training(
        controller: &ChatSessionController<Arc<ScriptedBackend>>,
        backend: &ScriptedBackend,
    ) {
        backend
            .chat
            .lock()
            .unwrap()
            .push_back(Ok(ChatResponse::new("Hi!").with_training_enabled(true)));
        assert!(controller.submit("hello").await.is_answered());
    }

    #[tokio::test]
    async fn empty_submit_is_rejected_without_request() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        let before = controller.transcript();
        for text in ["", "   ", "\n\t"] {
            let outcome = controller.submit(text).await;
            assert!(matches!(outcome, SubmitOutcome::Rejected(Rejection::Empty)));
        }
        assert!(backend.calls().is_empty());
        assert_eq!(controller.transcript(), before);
        assert_eq!(controller.state().message_count, 0);
    }

    #[tokio::test]
    async fn answered_exchange_updates_state() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new("Hello **there**")
            .with_timestamp("09:15")
            .with_training_enabled(true)));

        let outcome = controller.submit("  hi  ").await;
        assert!(outcome.is_answered());

        let state = controller.state();
        assert!(!state.is_awaiting_response);
        assert_eq!(state.last_exchange(), Some(("hi", "Hello **there**")));
        assert!(state.training_enabled);
        assert_eq!(state.message_count, 2);

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 3);
        let reply = transcript.last().unwrap();
        assert_eq!(reply.sender(), Sender::Bot);
        assert_eq!(reply.timestamp(), "09:15");
        assert!(reply.has_feedback_prompt());
        assert_eq!(reply.suggestions().len(), SUGGESTIONS_PER_REPLY);

        let events = recorder.events();
        assert!(events.contains(&RenderEvent::Typing(true)));
        assert!(events.contains(&RenderEvent::Control(Control::Send, false)));
        assert_eq!(events.last(), Some(&RenderEvent::Control(Control::Send, true)));
    }

    #[tokio::test]
    async fn suggestions_stop_after_first_reply() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        for reply in ["one", "two"] {
            backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new(reply)));
        }
        controller.submit("a").await;
        controller.submit("b").await;
        let transcript = controller.transcript();
        assert_eq!(transcript.messages()[2].suggestions().len(), SUGGESTIONS_PER_REPLY);
        assert!(transcript.messages()[4].suggestions().is_empty());
    }

    #[tokio::test]
    async fn failed_chat_apologizes_and_releases_gate() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        backend
            .chat
            .lock()
            .unwrap()
            .push_back(Err(Error::api(500, "boom")));

        let outcome = controller.submit("hi").await;
        assert!(matches!(outcome, SubmitOutcome::Apologized(ref err) if err.is_network()));
        assert_eq!(controller.transcript().last().unwrap().content(), APOLOGY);
        assert!(!controller.is_awaiting_response());
        assert_eq!(controller.state().last_exchange(), None);
        assert_eq!(backend.count(Endpoint::Chat), 1);
    }

    #[tokio::test]
    async fn reply_without_training_flag_disables_training() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        answered_with_training(&controller, &backend).await;
        assert!(controller.training_enabled());

        backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new("again")));
        assert!(controller.submit("more").await.is_answered());
        assert!(!controller.training_enabled());
        assert!(!controller.transcript().last().unwrap().has_feedback_prompt());
        assert!(matches!(
            controller.record_feedback(HELPFUL_RATING).await,
            Outcome::Rejected(Rejection::TrainingDisabled)
        ));
        assert_eq!(backend.count(Endpoint::Feedback), 0);
    }

    #[tokio::test]
    async fn latest_suggestions_follow_last_bot_message() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        assert!(controller.latest_suggestions().is_empty());
        for reply in ["one", "two"] {
            backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new(reply)));
        }

        controller.submit("a").await;
        let suggestions = controller.latest_suggestions();
        assert_eq!(suggestions.len(), SUGGESTIONS_PER_REPLY);
        assert_eq!(
            suggestions,
            controller.transcript().last().unwrap().suggestions().to_vec()
        );

        controller.submit("b").await;
        assert!(controller.latest_suggestions().is_empty());
    }

    #[test]
    fn thinking_delay_stays_within_jitter() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = Duration::from_millis(1000);
        assert_eq!(thinking_delay(base, Duration::ZERO, &mut rng), base);
        for _ in 0..32 {
            let delay = thinking_delay(base, base, &mut rng);
            assert!(delay >= base && delay <= base * 2);
        }
    }

    #[test]
    fn huge_jitter_saturates() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..32 {
            let delay = thinking_delay(Duration::MAX, Duration::MAX, &mut rng);
            assert_eq!(delay, Duration::MAX);
            let delay = thinking_delay(Duration::ZERO, Duration::MAX, &mut rng);
            assert!(delay <= Duration::from_millis(u64::MAX));
        }
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let (controller, backend, _) = controller(ScriptedBackend::parked_chat());
        backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new("first")));

        let mut first = tokio_test::task::spawn(controller.submit("one"));
        assert_pending!(first.poll());
        assert!(controller.is_awaiting_response());

        let second = controller.submit("two").await;
        assert!(matches!(second, SubmitOutcome::Rejected(Rejection::Busy)));
        assert_eq!(backend.count(Endpoint::Chat), 1);
        assert_eq!(controller.transcript().len(), 2);

        backend.chat_gate.as_ref().unwrap().notify_one();
        let outcome = assert_ready!(first.poll());
        assert!(outcome.is_answered());
        assert!(!controller.is_awaiting_response());
    }

    #[tokio::test]
    async fn dropped_submit_releases_gate() {
        let (controller, _backend, _) = controller(ScriptedBackend::parked_chat());
        let mut pending = tokio_test::task::spawn(controller.submit("one"));
        assert_pending!(pending.poll());
        assert!(controller.is_awaiting_response());
        drop(pending);
        assert!(!controller.is_awaiting_response());
    }

    #[tokio::test]
    async fn feedback_without_exchange_sends_nothing() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        backend.reports.lock().unwrap().push_back(Ok(report(true, 0)));
        assert!(controller.refresh_stats().await);

        let outcome = controller.record_feedback(5).await;
        assert!(matches!(outcome, Outcome::Rejected(Rejection::NoExchange)));
        assert_eq!(backend.count(Endpoint::Feedback), 0);
    }

    #[tokio::test]
    async fn feedback_requires_training() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new("Hi!")));
        controller.submit("hello").await;

        let outcome = controller.record_feedback(5).await;
        assert!(matches!(outcome, Outcome::Rejected(Rejection::TrainingDisabled)));
        assert!(outcome.error().unwrap().is_invalid_state());
        assert_eq!(backend.count(Endpoint::Feedback), 0);
    }

    #[tokio::test]
    async fn successful_feedback_refreshes_stats_once() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        answered_with_training(&controller, &backend).await;
        backend.feedback.lock().unwrap().push_back(Ok(success()));
        backend.reports.lock().unwrap().push_back(Ok(report(true, 4)));

        let outcome = controller.record_feedback(HELPFUL_RATING).await;
        assert!(outcome.is_done());
        assert_eq!(backend.count(Endpoint::TrainingReport), 1);
        assert_eq!(controller.stats_display().conversation_count, "4");
        assert_eq!(controller.stats_display().model_status, MODEL_TRAINED);

        let sent = backend.feedback_bodies.lock().unwrap().clone();
        assert_eq!(sent, vec![FeedbackRequest::rated("hello", "Hi!", 5)]);
        assert!(recorder
            .notifications()
            .contains(&Notification::success("Thanks for your feedback! 🎯")));
    }

    #[tokio::test]
    async fn refused_feedback_skips_refresh() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        answered_with_training(&controller, &backend).await;
        backend.feedback.lock().unwrap().push_back(Ok(FeedbackResponse::default()));

        let outcome = controller.record_feedback(UNHELPFUL_RATING).await;
        assert!(matches!(outcome, Outcome::Refused(None)));
        assert_eq!(backend.count(Endpoint::TrainingReport), 0);
        let sent = backend.feedback_bodies.lock().unwrap().clone();
        assert_eq!(sent[0].feedback, "Needs improvement");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_display() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.reports.lock().unwrap().push_back(Ok(report(true, 9)));
        assert!(controller.refresh_stats().await);
        let shown = controller.stats_display();
        recorder.reset();

        backend
            .reports
            .lock()
            .unwrap()
            .push_back(Err(Error::timeout("timed out", Some(30.0))));
        assert!(!controller.refresh_stats().await);
        assert_eq!(controller.stats_display(), shown);
        assert!(!controller.training_enabled());
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn unavailable_report_resets_display() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        backend.reports.lock().unwrap().push_back(Ok(report(true, 9)));
        controller.refresh_stats().await;
        backend.reports.lock().unwrap().push_back(Ok(TrainingReport::default()));
        assert!(controller.refresh_stats().await);
        assert_eq!(controller.stats_display(), StatsDisplay::default());
        assert!(!controller.training_enabled());
    }

    #[tokio::test]
    async fn teach_requires_both_fields() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        let outcome = controller.teach("", "x").await;
        assert!(matches!(outcome, Outcome::Rejected(Rejection::MissingFields)));
        assert!(outcome.error().unwrap().is_validation());
        let outcome = controller.teach("x", "   ").await;
        assert!(outcome.is_rejected());
        assert!(backend.calls().is_empty());
        assert_eq!(
            recorder.notifications(),
            vec![
                Notification::warning("Please fill in both fields ⚠️"),
                Notification::warning("Please fill in both fields ⚠️"),
            ]
        );
    }

    #[tokio::test]
    async fn teach_from_composer_clears_fields() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.feedback.lock().unwrap().push_back(Ok(success()));
        backend.reports.lock().unwrap().push_back(Ok(report(true, 1)));
        controller.set_teach_fields(" what is rust? ", "A language.");

        let outcome = controller.teach_from_composer().await;
        assert!(outcome.is_done());
        assert_eq!(controller.composer().teach_fields(), ("", ""));
        let sent = backend.feedback_bodies.lock().unwrap().clone();
        assert_eq!(sent, vec![FeedbackRequest::taught("what is rust?", "A language.")]);
        assert_eq!(backend.count(Endpoint::TrainingReport), 1);
        assert!(recorder
            .notifications()
            .contains(&Notification::success("AI-BD learned new response! 🎓")));
    }

    #[tokio::test]
    async fn failed_teach_keeps_fields() {
        let (controller, _backend, recorder) = controller(ScriptedBackend::default());
        controller.set_teach_fields("hi", "hello");
        let outcome = controller.teach_from_composer().await;
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(controller.composer().teach_fields(), ("hi", "hello"));
        assert_eq!(
            recorder.notifications(),
            vec![Notification::error("❌ Teaching failed")]
        );
    }

    #[tokio::test]
    async fn retrain_success_refreshes_stats() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.retrain.lock().unwrap().push_back(Ok(RetrainResponse {
            success: true,
            message: None,
        }));
        backend.reports.lock().unwrap().push_back(Ok(report(true, 3)));

        assert!(controller.retrain().await.is_done());
        assert_eq!(backend.calls(), vec![Endpoint::Retrain, Endpoint::TrainingReport]);
        assert!(controller.is_retrain_enabled());
        let events = recorder.events();
        assert!(events.contains(&RenderEvent::Control(Control::Retrain, false)));
        assert!(events.contains(&RenderEvent::Control(Control::Retrain, true)));
    }

    #[tokio::test]
    async fn retrain_refusal_and_failure_notify() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.retrain.lock().unwrap().push_back(Ok(RetrainResponse {
            success: false,
            message: Some("no training data available".to_string()),
        }));
        let outcome = controller.retrain().await;
        assert!(matches!(outcome, Outcome::Refused(Some(_))));
        let outcome = controller.retrain().await;
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(
            recorder.notifications(),
            vec![
                Notification::warning("⚠️ no training data available"),
                Notification::error("❌ Training failed"),
            ]
        );
        assert_eq!(backend.count(Endpoint::TrainingReport), 0);
        assert!(controller.is_retrain_enabled());
    }

    #[tokio::test]
    async fn concurrent_retrain_is_rejected() {
        let (controller, backend, _) = controller(ScriptedBackend::parked_retrain());
        let mut first = tokio_test::task::spawn(controller.retrain());
        assert_pending!(first.poll());
        assert!(!controller.is_retrain_enabled());

        let second = controller.retrain().await;
        assert!(matches!(second, Outcome::Rejected(Rejection::Busy)));
        assert_eq!(backend.count(Endpoint::Retrain), 1);

        drop(first);
        assert!(controller.is_retrain_enabled());
    }

    #[tokio::test]
    async fn export_reports_filename() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.export.lock().unwrap().push_back(Ok(ExportResponse {
            success: true,
            filename: Some("exported_training_data.json".to_string()),
            message: None,
        }));
        let outcome = controller.export_training().await;
        assert!(matches!(outcome, Outcome::Done(ref name) if name == "exported_training_data.json"));
        let outcome = controller.export_training().await;
        assert!(matches!(outcome, Outcome::Failed(_)));
        let levels: Vec<_> = recorder.notifications().into_iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NotificationLevel::Success, NotificationLevel::Error]);
    }

    #[tokio::test]
    async fn clear_keeps_welcome_and_last_exchange() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        answered_with_training(&controller, &backend).await;
        controller.clear();

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content(), crate::chat::config::DEFAULT_WELCOME);
        assert_eq!(controller.state().message_count, 0);
        assert!(controller.state().last_exchange().is_some());
        assert_eq!(recorder.events().last(), Some(&RenderEvent::Cleared));
    }

    #[tokio::test]
    async fn send_suggestion_goes_through_draft() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        backend.chat.lock().unwrap().push_back(Ok(ChatResponse::new("Lots of things.")));
        let outcome = controller.send_suggestion("What can you do?").await;
        assert!(outcome.is_answered());
        assert_eq!(controller.composer().draft(), "");
        assert_eq!(
            controller.state().last_user_message.as_deref(),
            Some("What can you do?")
        );
    }

    #[tokio::test]
    async fn init_renders_welcome_and_loads_stats() {
        let (controller, backend, recorder) = controller(ScriptedBackend::default());
        backend.reports.lock().unwrap().push_back(Ok(report(true, 5)));
        controller.init().await;

        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content(), crate::chat::config::DEFAULT_WELCOME);
        assert!(controller.training_enabled());
        assert_eq!(controller.stats_display().conversation_count, "5");
    }

    #[tokio::test]
    async fn disposed_session_rejects_everything() {
        let (controller, backend, _) = controller(ScriptedBackend::default());
        answered_with_training(&controller, &backend).await;
        let calls = backend.calls().len();

        let summary = controller.dispose();
        assert_eq!(summary.transcript.len(), 3);
        assert_eq!(summary.state.message_count, 2);

        assert!(matches!(
            controller.submit("hi").await,
            SubmitOutcome::Rejected(Rejection::Disposed)
        ));
        assert!(controller.record_feedback(5).await.is_rejected());
        assert!(controller.teach("a", "b").await.is_rejected());
        assert!(controller.retrain().await.is_rejected());
        assert!(controller.export_training().await.is_rejected());
        assert!(!controller.refresh_stats().await);
        assert_eq!(backend.calls().len(), calls);
    }
}
