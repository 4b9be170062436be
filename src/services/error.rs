//! Error taxonomy shared by every external collaborator.

use regex::Regex;
use std::sync::LazyLock;

/// Messages that mean "slow down" even when the status code does not say so.
static RATE_LIMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rate[\s_-]?limit|too many requests|\b429\b").expect("valid rate-limit regex")
});

/// Failure of a relay call.
///
/// None of these escape the board; each is turned into a notice or a
/// fallback value by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The relay (or this client) is missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The upstream asked us to slow down
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error text extracted from the body
        message: String,
    },

    /// The request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be understood
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Classifies a non-success HTTP answer.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 429 || is_rate_limit_message(&message) {
            Self::RateLimited(message)
        } else if status == 500 && message.to_ascii_lowercase().contains("config") {
            Self::Config(message)
        } else {
            Self::Upstream { status, message }
        }
    }

    /// Returns true when the caller should show a "slow down" notice.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Network(message) | Self::Malformed(message) | Self::Config(message) => {
                is_rate_limit_message(message)
            }
            Self::Upstream { message, .. } => is_rate_limit_message(message),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        Self::Network(err.to_string())
    }
}

/// Returns true if an error message reads like a rate-limit rejection.
#[must_use]
pub fn is_rate_limit_message(message: &str) -> bool {
    RATE_LIMIT_PATTERN.is_match(message)
}
