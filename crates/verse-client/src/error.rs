use sanctuary_core::SanctuaryError;
use thiserror::Error;

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    /// A definitive answer: retrying cannot change it.
    #[error("{0}")]
    Permanent(String),
}

impl AttemptError {
    pub fn from_status(status: u16) -> Self {
        if status == 429 {
            AttemptError::RateLimited
        } else {
            AttemptError::Status(status)
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, AttemptError::Permanent(_))
    }
}

/// Terminal outcome of a retry sequence that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: AttemptError },

    #[error("request failed: {0}")]
    Rejected(AttemptError),

    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum VerseClientError {
    #[error(transparent)]
    Reference(#[from] SanctuaryError),

    #[error(transparent)]
    Retry(#[from] RetryError),

    #[error("a verse lookup is already in progress")]
    Busy,

    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
