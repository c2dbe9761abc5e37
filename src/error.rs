/// Error type returned by every [`ServiceClient`](crate::ServiceClient) call.
///
/// The shape of a failure is decided once, when the attempt completes:
/// callers branch on [`ClientError::error_code`] or match the variant.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (reset, refused, timeout).
    #[error("{service}: transport error: {message}")]
    Transport {
        /// Name of the client that issued the request.
        service: String,
        /// Description of the transport failure.
        message: String,
        /// Whether the peer reset the connection.
        connection_reset: bool,
        #[source]
        source: reqwest::Error,
    },
    /// Non-success HTTP status from the upstream service.
    #[error("{service}: http error {status}: {message}")]
    Application {
        /// Name of the client that issued the request.
        service: String,
        /// HTTP status code returned upstream.
        status: u16,
        /// Upstream `message`, or a synthetic one when the body has none.
        message: String,
        /// Upstream `error_identifier`, if present.
        error_identifier: Option<String>,
    },
    /// A successful response whose body could not be read or decoded.
    #[error("{service}: decode error: {message}")]
    Decode { service: String, message: String },
}

impl ClientError {
    /// Human-readable failure message.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. }
            | Self::Application { message, .. }
            | Self::Decode { message, .. } => message,
        }
    }

    /// Upstream HTTP status, or 500 for failures without one.
    pub fn error_code(&self) -> u16 {
        match self {
            Self::Application { status, .. } => *status,
            Self::Transport { .. } | Self::Decode { .. } => 500,
        }
    }

    /// Machine-readable identifier supplied by the upstream service.
    pub fn error_identifier(&self) -> Option<&str> {
        match self {
            Self::Application {
                error_identifier, ..
            } => error_identifier.as_deref(),
            _ => None,
        }
    }

    /// Name of the client the failing request went through.
    pub fn service(&self) -> &str {
        match self {
            Self::Transport { service, .. }
            | Self::Application { service, .. }
            | Self::Decode { service, .. } => service,
        }
    }

    /// Whether the failure was a connection reset.
    pub fn is_connection_reset(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                connection_reset: true,
                ..
            }
        )
    }

    /// Whether the upstream answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Application { status: 404, .. })
    }
}
