use std::{
    error::Error as StdError,
    fmt, io,
    time::{Duration, Instant},
};

use reqwest::{header, Method, StatusCode};
use serde::Serialize;
use tokio::time::sleep;

use crate::{
    hooks::{FailureMetadata, RequestMetadata, SuccessMetadata},
    wire::{self, ErrorBody},
    ClientError, ClientOptions, ClientResponse, Hooks, RequestOptions, Result,
};

/// Header carrying the caller's correlation id to downstream services.
pub const CORRELATION_HEADER: &str = "x-request-id";

/// Joins a base URL and a relative path.
///
/// Absolute `http(s)://` paths are used as-is and an empty path targets the
/// base URL itself.
pub fn join_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return base_url.to_owned();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Clone)]
/// HTTP client for one named downstream service.
///
/// Build it once per service and share it: clones reuse the same connection
/// pool, base URL and hooks.
pub struct ServiceClient {
    http: reqwest::Client,
    service: String,
    base_url: String,
    hooks: Hooks,
    options: ClientOptions,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("hooks", &self.hooks)
            .field("options", &self.options)
            .finish()
    }
}

impl ServiceClient {
    /// Creates an unconfigured client named after the service it reaches.
    ///
    /// The name is reported in every [`ClientError`] and hook call.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            service: service.into(),
            base_url: String::new(),
            hooks: Hooks::default(),
            options: ClientOptions::default(),
        }
    }

    /// Sets the target origin (with optional path prefix) and lifecycle hooks.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pay_service_client::{Hooks, ServiceClient};
    ///
    /// let ledger = ServiceClient::new("ledger")
    ///     .configure("http://127.0.0.1:8006", Hooks::new());
    /// ```
    pub fn configure(mut self, base_url: impl Into<String>, hooks: Hooks) -> Self {
        self.base_url = base_url.into();
        self.hooks = hooks;
        self
    }

    /// Applies timeout and retry options.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the underlying `reqwest` client, e.g. to share a pool.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Name reported in errors and hook metadata.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Origin (and path prefix) requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a `GET` to `path`.
    pub async fn get(&self, path: &str, description: &str) -> Result<ClientResponse> {
        self.request(Method::GET, path, described(description)).await
    }

    /// Sends a `DELETE` to `path`.
    pub async fn delete(&self, path: &str, description: &str) -> Result<ClientResponse> {
        self.request(Method::DELETE, path, described(description)).await
    }

    /// Sends a `POST` with `body` encoded as JSON.
    pub async fn post<B>(&self, path: &str, body: &B, description: &str) -> Result<ClientResponse>
    where
        B: Serialize + ?Sized,
    {
        let options = self.with_body(described(description), body)?;
        self.request(Method::POST, path, options).await
    }

    /// Sends a `PUT` with `body` encoded as JSON.
    pub async fn put<B>(&self, path: &str, body: &B, description: &str) -> Result<ClientResponse>
    where
        B: Serialize + ?Sized,
    {
        let options = self.with_body(described(description), body)?;
        self.request(Method::PUT, path, options).await
    }

    /// Sends a `PATCH` with `body` encoded as JSON.
    pub async fn patch<B>(&self, path: &str, body: &B, description: &str) -> Result<ClientResponse>
    where
        B: Serialize + ?Sized,
    {
        let options = self.with_body(described(description), body)?;
        self.request(Method::PATCH, path, options).await
    }

    /// Sends a request, retrying it while the connection is reset.
    ///
    /// Every attempt fires `on_request_start` and then exactly one of
    /// `on_success_response` / `on_failure_response`. Attempts are
    /// sequential; the first 2xx or non-retryable failure ends the call.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ClientResponse> {
        let full_url = join_url(&self.base_url, path);
        let attempt_limit = self.options.attempt_limit();
        let mut retry_count = 1u32;

        loop {
            let meta = RequestMetadata {
                service: self.service.clone(),
                method: method.clone(),
                url: path.to_owned(),
                full_url: full_url.clone(),
                description: options.description.clone(),
                correlation_id: options.correlation_id.clone(),
                retry_count,
            };
            self.hooks.request_start(&meta);

            let started = Instant::now();
            let outcome = self.send_once(&method, path, &full_url, &options).await;
            let response_time = started.elapsed();

            match outcome {
                Ok(response) => {
                    self.hooks.success_response(&SuccessMetadata {
                        request: meta,
                        status: response.status.as_u16(),
                        response_time,
                    });
                    return Ok(response);
                }
                Err(err) => {
                    let retry = err.is_connection_reset() && retry_count < attempt_limit;
                    self.hooks.failure_response(&FailureMetadata {
                        request: meta,
                        status: match &err {
                            ClientError::Application { status, .. } => Some(*status),
                            _ => None,
                        },
                        error_code: err.error_code(),
                        message: err.message().to_owned(),
                        error_identifier: err.error_identifier().map(str::to_owned),
                        retry,
                        response_time,
                    });

                    if !retry {
                        return Err(err);
                    }
                    self.wait_before_retry(retry_count).await;
                    retry_count += 1;
                }
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        full_url: &str,
        options: &RequestOptions,
    ) -> Result<ClientResponse> {
        let mut builder = self
            .http
            .request(method.clone(), full_url)
            .header(header::ACCEPT, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms));

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(correlation_id) = &options.correlation_id {
            builder = builder.header(CORRELATION_HEADER, correlation_id.as_str());
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            return Err(self.application_error(method, path, status, &body));
        }

        Ok(ClientResponse {
            status,
            headers,
            data: wire::parse_data(&body),
            service: self.service.clone(),
        })
    }

    pub(crate) fn with_body<B>(&self, options: RequestOptions, body: &B) -> Result<RequestOptions>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|err| ClientError::Decode {
            service: self.service.clone(),
            message: format!("request body could not be encoded: {err}"),
        })?;
        Ok(options.body(body))
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        ClientError::Transport {
            service: self.service.clone(),
            message: describe_transport_error(&err),
            connection_reset: is_connection_reset(&err),
            source: err,
        }
    }

    fn application_error(
        &self,
        method: &Method,
        path: &str,
        status: StatusCode,
        body: &str,
    ) -> ClientError {
        let parsed = ErrorBody::parse(body);
        let message = parsed.message().unwrap_or_else(|| {
            format!(
                "{} {} to {} failed with status code {}",
                self.service,
                method,
                path,
                status.as_u16()
            )
        });
        ClientError::Application {
            service: self.service.clone(),
            status: status.as_u16(),
            message,
            error_identifier: parsed.error_identifier,
        }
    }

    /// Waits before the next attempt using exponential backoff.
    ///
    /// With the default zero backoff the next attempt starts immediately.
    async fn wait_before_retry(&self, retry_count: u32) {
        let exp = retry_count.saturating_sub(1).min(16);
        let multiplier = 1u64 << exp;
        let delay_ms = self.options.retry_backoff_ms.saturating_mul(multiplier);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            service = %self.service,
            retry_count,
            "connection reset, retrying request after {} ms",
            delay_ms
        );

        if delay_ms > 0 {
            sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

fn described(description: &str) -> RequestOptions {
    let options = RequestOptions::new();
    if description.is_empty() {
        options
    } else {
        options.description(description)
    }
}

/// True when any cause of `err` is an I/O error of kind `ConnectionReset`.
fn is_connection_reset(err: &reqwest::Error) -> bool {
    let mut cause: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(current) = cause {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        cause = current.source();
    }
    false
}

/// The `reqwest` message followed by its innermost cause, which is usually
/// the part worth logging ("connection reset by peer", "operation timed out").
fn describe_transport_error(err: &reqwest::Error) -> String {
    let mut root: Option<&(dyn StdError + 'static)> = None;
    let mut cause = err.source();
    while let Some(current) = cause {
        root = Some(current);
        cause = current.source();
    }
    match root {
        Some(root) => format!("{err}: {root}"),
        None => err.to_string(),
    }
}
