// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod format;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use backend::{ChatBackend, Endpoint};
pub use chat::{ChatSessionController, SessionState, SubmitOutcome};
pub use client::BackendClient;
pub use client_logger::{ClientLogger, FileLogger};
pub use error::{Error, ErrorKind, Result};
pub use format::{Inline, Rendering, render_markup};
pub use observability::register_biometrics;
pub use render::{Control, PlainTextRenderer, RecordingRenderer, RenderEvent, Renderer};
pub use types::*;
