use reqwest::{header::HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::ClientError;

/// Per-request inputs beyond method and path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    /// JSON body sent with the request.
    pub body: Option<JsonValue>,
    /// Human-readable description, used only in hook metadata.
    pub description: Option<String>,
    /// Extra headers as name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Query string pairs appended to the URL.
    pub query: Vec<(String, String)>,
    /// Sent as the `x-request-id` header when present.
    pub correlation_id: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// A 2xx response with its body parsed as JSON.
#[derive(Clone, Debug)]
pub struct ClientResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed body. Empty bodies are `null`; non-JSON bodies are kept as a
    /// JSON string.
    pub data: JsonValue,
    pub(crate) service: String,
}

impl ClientResponse {
    /// Deserializes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        T::deserialize(&self.data).map_err(|err| ClientError::Decode {
            service: self.service.clone(),
            message: format!("unexpected response body: {err}"),
        })
    }
}
