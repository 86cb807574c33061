// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod export_response;
pub mod feedback_request;
pub mod feedback_response;
pub mod message;
pub mod notification;
pub mod retrain_response;
pub mod sender;
pub mod stats_display;
pub mod training_report;
pub mod transcript;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::ChatResponse;
pub use export_response::ExportResponse;
pub use feedback_request::{FeedbackLabel, FeedbackRequest, MAX_RATING, MIN_RATING};
pub use feedback_response::FeedbackResponse;
pub use message::Message;
pub use notification::{Notification, NotificationLevel};
pub use retrain_response::RetrainResponse;
pub use sender::Sender;
pub use stats_display::{MODEL_NOT_TRAINED, MODEL_TRAINED, StatsDisplay};
pub use training_report::{LearningRate, TrainingReport, TrainingStats};
pub use transcript::Transcript;
