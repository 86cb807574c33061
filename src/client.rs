use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::backend::{ChatBackend, Endpoint};
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ChatRequest, ChatResponse, ExportResponse, FeedbackRequest, FeedbackResponse,
    RetrainResponse, TrainingReport,
};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

/// Environment variable consulted for the base URL.
pub const BASE_URL_ENV: &str = "CHATTERBOX_BASE_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body carried into an [`Error::Api`] message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the chatbot backend.
#[derive(Clone)]
pub struct BackendClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// The base URL can be provided directly or read from the
    /// `CHATTERBOX_BASE_URL` environment variable, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for backend requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn request(&self, endpoint: Endpoint) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint.path())?;
        let builder = if endpoint.is_post() {
            self.client.post(url)
        } else {
            self.client.get(url)
        };
        Ok(builder.headers(self.default_headers()))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let request = self.request(endpoint)?;
        self.execute(endpoint, request, None).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> Result<T> {
        let mut request = self.request(endpoint)?;
        let body = match body {
            Some(body) => Some(serde_json::to_string(body)?),
            None => None,
        };
        if let Some(body) = &body {
            request = request.body(body.clone());
        }
        self.execute(endpoint, request, body.as_deref()).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
        body: Option<&str>,
    ) -> Result<T> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(endpoint, body);
        }
        let start = Instant::now();
        let result = self.round_trip(endpoint, request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            if let Some(logger) = &self.logger {
                logger.log_error(endpoint, err);
            }
        }
        result
    }

    async fn round_trip<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        if let Some(logger) = &self.logger {
            logger.log_response(endpoint, status.as_u16(), &text);
        }

        if !status.is_success() {
            return Err(Error::api(status.as_u16(), summarize_body(&text, status)));
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            Error::serialization(
                format!("Failed to parse {endpoint} response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for BackendClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post(Endpoint::Chat, Some(request)).await
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackResponse> {
        self.post(Endpoint::Feedback, Some(request)).await
    }

    async fn training_report(&self) -> Result<TrainingReport> {
        self.get(Endpoint::TrainingReport).await
    }

    async fn retrain(&self) -> Result<RetrainResponse> {
        self.post::<(), _>(Endpoint::Retrain, None).await
    }

    async fn export_training(&self) -> Result<ExportResponse> {
        self.get(Endpoint::ExportTraining).await
    }
}

/// Parse a base URL and make sure relative joins land beneath it.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn summarize_body(body: &str, status: reqwest::StatusCode) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
