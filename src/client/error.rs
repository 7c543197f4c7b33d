//! Transport-level errors for the Risingstones API client

use thiserror::Error;

/// Errors raised while moving bytes to and from the remote host
///
/// These never describe the payload itself: the client hands back whatever
/// the server answered, so only "no usable response" ends up here.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded after {attempts} attempts: {last}")]
    MaxRetriesExceeded { attempts: u32, last: String },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            Self::MaxRetriesExceeded { .. } | Self::InvalidUrl(_) => false,
        }
    }

    /// Classify a reqwest failure, folding timeouts into [`TransportError::Timeout`]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}
