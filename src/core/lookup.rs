//! Remote gender lookup capability.

/// Answer from a name → gender service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    /// Service label, e.g. `"female"`, `"male"` or `"unknown"`.
    pub gender: String,
    /// Confidence score from 0 to 100.
    pub accuracy: u32,
}

/// Errors from a single lookup. None of them abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("service responded with HTTP {status}")]
    Status { status: u16 },

    #[error("invalid response: {message}")]
    Decode { message: String },
}

impl LookupError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Network { .. } | LookupError::Timeout => true,
            LookupError::Status { status } => *status == 429 || *status >= 500,
            LookupError::Client { .. } | LookupError::Decode { .. } => false,
        }
    }
}

/// Look up the gender of a single normalized name.
pub trait GenderLookup {
    fn lookup(&self, name: &str) -> Result<LookupResponse, LookupError>;
}
