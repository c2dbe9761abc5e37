use std::{fmt, sync::Arc, time::Duration};

use reqwest::Method;

/// Describes one attempt of a request. Passed to every hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Name of the client issuing the request.
    pub service: String,
    pub method: Method,
    /// Path as given by the caller, relative to the base URL.
    pub url: String,
    /// Base URL joined with [`RequestMetadata::url`].
    pub full_url: String,
    /// Caller-supplied description. Never sent upstream.
    pub description: Option<String>,
    pub correlation_id: Option<String>,
    /// 1 for the first attempt, incremented on every retry.
    pub retry_count: u32,
}

/// Passed to `on_success_response` after a 2xx attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuccessMetadata {
    pub request: RequestMetadata,
    pub status: u16,
    pub response_time: Duration,
}

/// Passed to `on_failure_response` after a failed attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureMetadata {
    pub request: RequestMetadata,
    /// HTTP status, when the upstream answered at all.
    pub status: Option<u16>,
    pub error_code: u16,
    pub message: String,
    pub error_identifier: Option<String>,
    /// Whether the client is about to try the request again.
    pub retry: bool,
    pub response_time: Duration,
}

type Callback<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Lifecycle callbacks invoked around every attempt.
///
/// Each callback is optional and defaults to a no-op. Callbacks run
/// synchronously on the request's task and cannot change its outcome, so
/// they should stay cheap (logging, counters).
#[derive(Clone, Default)]
pub struct Hooks {
    request_start: Option<Callback<RequestMetadata>>,
    success_response: Option<Callback<SuccessMetadata>>,
    failure_response: Option<Callback<FailureMetadata>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_request_start", &self.request_start.is_some())
            .field("on_success_response", &self.success_response.is_some())
            .field("on_failure_response", &self.failure_response.is_some())
            .finish()
    }
}

impl Hooks {
    /// Creates an empty hook table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per attempt, before dispatch.
    pub fn on_request_start<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RequestMetadata) + Send + Sync + 'static,
    {
        self.request_start = Some(Arc::new(callback));
        self
    }

    /// Called once per attempt that received a 2xx response.
    pub fn on_success_response<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SuccessMetadata) + Send + Sync + 'static,
    {
        self.success_response = Some(Arc::new(callback));
        self
    }

    /// Called once per attempt that failed, retried or not.
    pub fn on_failure_response<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FailureMetadata) + Send + Sync + 'static,
    {
        self.failure_response = Some(Arc::new(callback));
        self
    }

    /// Hook table that records every attempt as a structured `tracing` event.
    #[cfg(feature = "tracing")]
    pub fn logging() -> Self {
        Self::new()
            .on_request_start(|meta| {
                tracing::debug!(
                    service = %meta.service,
                    method = %meta.method,
                    url = %meta.full_url,
                    description = meta.description.as_deref(),
                    correlation_id = meta.correlation_id.as_deref(),
                    retry_count = meta.retry_count,
                    "calling {}", meta.service
                );
            })
            .on_success_response(|meta| {
                tracing::info!(
                    service = %meta.request.service,
                    method = %meta.request.method,
                    url = %meta.request.full_url,
                    description = meta.request.description.as_deref(),
                    correlation_id = meta.request.correlation_id.as_deref(),
                    status = meta.status,
                    response_time_ms = meta.response_time.as_millis() as u64,
                    "{} {} to {} ended with status {}",
                    meta.request.method,
                    meta.request.service,
                    meta.request.url,
                    meta.status
                );
            })
            .on_failure_response(|meta| {
                tracing::warn!(
                    service = %meta.request.service,
                    method = %meta.request.method,
                    url = %meta.request.full_url,
                    description = meta.request.description.as_deref(),
                    correlation_id = meta.request.correlation_id.as_deref(),
                    status = meta.status,
                    error_code = meta.error_code,
                    error_identifier = meta.error_identifier.as_deref(),
                    retry = meta.retry,
                    retry_count = meta.request.retry_count,
                    response_time_ms = meta.response_time.as_millis() as u64,
                    "{} {} to {} failed: {}",
                    meta.request.method,
                    meta.request.service,
                    meta.request.url,
                    meta.message
                );
            })
    }

    pub(crate) fn request_start(&self, meta: &RequestMetadata) {
        if let Some(callback) = &self.request_start {
            callback(meta);
        }
    }

    pub(crate) fn success_response(&self, meta: &SuccessMetadata) {
        if let Some(callback) = &self.success_response {
            callback(meta);
        }
    }

    pub(crate) fn failure_response(&self, meta: &FailureMetadata) {
        if let Some(callback) = &self.failure_response {
            callback(meta);
        }
    }
}
