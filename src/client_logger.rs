//! Logging trait for backend client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log every request passing through the [`BackendClient`], and a
//! [`FileLogger`] that appends one line per event to a file.
//!
//! [`BackendClient`]: crate::BackendClient

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::backend::Endpoint;
use crate::error::{Error, Result};
use crate::observability::CLIENT_LOG_WRITE_ERRORS;

/// A trait for logging backend client operations.
///
/// # Example
///
/// ```rust
/// use std::sync::{Mutex, PoisonError};
/// use chatterbox::{ClientLogger, Endpoint, Error};
///
/// #[derive(Default)]
/// struct Recorder {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl ClientLogger for Recorder {
///     fn log_response(&self, endpoint: Endpoint, status: u16, body: &str) {
///         self.lines.lock().unwrap().push(format!("{endpoint} {status} {body}"));
///     }
///
///     fn log_error(&self, endpoint: Endpoint, error: &Error) {
///         self.lines.lock().unwrap().push(format!("{endpoint} {error}"));
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outgoing request and its JSON body, if any.
    fn log_request(&self, endpoint: Endpoint, body: Option<&str>) {
        _ = endpoint;
        _ = body;
    }

    /// Log the raw response received for a request.
    ///
    /// Called for every response that arrives, successful or not, before the
    /// body is parsed.
    fn log_response(&self, endpoint: Endpoint, status: u16, body: &str);

    /// Log a request that ended in an error.
    fn log_error(&self, endpoint: Endpoint, error: &Error);
}

/// A [`ClientLogger`] that appends to a file.
pub struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    /// Open (or create) `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|err| Error::io("failed to open client log", err))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn write_line(&self, line: &str) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if writeln!(file, "{line}").is_err() {
            CLIENT_LOG_WRITE_ERRORS.click();
        }
    }
}

impl ClientLogger for FileLogger {
    fn log_request(&self, endpoint: Endpoint, body: Option<&str>) {
        match body {
            Some(body) => self.write_line(&format!("-> {endpoint} {body}")),
            None => self.write_line(&format!("-> {endpoint}")),
        }
    }

    fn log_response(&self, endpoint: Endpoint, status: u16, body: &str) {
        self.write_line(&format!("<- {endpoint} {status} {body}"));
    }

    fn log_error(&self, endpoint: Endpoint, error: &Error) {
        self.write_line(&format!("!! {endpoint} {error}"));
    }
}
