//! The seam between the session controller and the chatbot backend.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{
    ChatRequest, ChatResponse, ExportResponse, FeedbackRequest, FeedbackResponse,
    RetrainResponse, TrainingReport,
};

/// The backend endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /chat`
    Chat,
    /// `POST /feedback`
    Feedback,
    /// `GET /training_report`
    TrainingReport,
    /// `POST /retrain`
    Retrain,
    /// `GET /export_training`
    ExportTraining,
}

impl Endpoint {
    /// Path relative to the backend base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::Feedback => "feedback",
            Endpoint::TrainingReport => "training_report",
            Endpoint::Retrain => "retrain",
            Endpoint::ExportTraining => "export_training",
        }
    }

    /// True for endpoints called with `POST`.
    pub fn is_post(&self) -> bool {
        matches!(
            self,
            Endpoint::Chat | Endpoint::Feedback | Endpoint::Retrain
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = if self.is_post() { "POST" } else { "GET" };
        write!(f, "{method} /{}", self.path())
    }
}

/// Operations the session controller needs from a chatbot backend.
///
/// [`BackendClient`](crate::BackendClient) implements this over HTTP.  Every
/// method is a single fire-and-await request; implementations must not retry.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a user message and receive the bot's reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Record a rating (or a taught response) for an exchange.
    async fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackResponse>;

    /// Fetch the current training statistics.
    async fn training_report(&self) -> Result<TrainingReport>;

    /// Ask the backend to retrain its model.
    async fn retrain(&self) -> Result<RetrainResponse>;

    /// Ask the backend to export its training data.
    async fn export_training(&self) -> Result<ExportResponse>;
}

#[async_trait::async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for Arc<B> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        (**self).chat(request).await
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackResponse> {
        (**self).feedback(request).await
    }

    async fn training_report(&self) -> Result<TrainingReport> {
        (**self).training_report().await
    }

    async fn retrain(&self) -> Result<RetrainResponse> {
        (**self).retrain().await
    }

    async fn export_training(&self) -> Result<ExportResponse> {
        (**self).export_training().await
    }
}
