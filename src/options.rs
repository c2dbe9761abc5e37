/// Configures per-attempt timeout and connection-reset retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of attempts, including the first one, for requests
    /// failing with a connection reset.
    pub max_attempts: u32,
    /// Base delay between attempts in milliseconds (exponential strategy).
    /// Zero retries immediately.
    pub retry_backoff_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_attempts: 3,
            retry_backoff_ms: 0,
        }
    }
}

impl ClientOptions {
    pub(crate) fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
