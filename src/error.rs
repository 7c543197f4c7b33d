//! Unified error handling for the llmaget crate
//!
//! Every domain operation returns [`Result`]. Errors are classified through
//! [`ErrorCategory`] so the HTTP layer and the scheduler can decide what to do
//! with them without matching on every variant.
//!
//! # Taxonomy
//!
//! - [`Error::Auth`] - no cookie configured, detected before any request
//! - [`Error::Transport`] - network failure, timeout or exhausted retries
//! - [`Error::Decode`] - remote payload could not be decoded
//! - [`Error::Fetch`] - a domain read failed; wraps transport/decode with context
//! - [`Error::NotFound`] - search exhausted, or no local data yet
//! - [`Error::Validation`] - bad inbound request parameters

use std::io;
use thiserror::Error;

pub use crate::client::error::TransportError;
use crate::models::ClaimSummary;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or rejected credentials
    Auth,
    /// Network-related errors (HTTP, timeout, retries)
    Network,
    /// Remote payload errors (decode failures, remote error codes)
    Data,
    /// Nothing to return
    NotFound,
    /// Bad input from the caller
    Validation,
    /// Local file I/O
    Storage,
    /// Service settings
    Config,
}

impl ErrorCategory {
    /// Short human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth => "authentication",
            Self::Network => "network",
            Self::Data => "data",
            Self::NotFound => "not found",
            Self::Validation => "validation",
            Self::Storage => "storage",
            Self::Config => "configuration",
        }
    }
}

/// Unified error type for the llmaget crate
#[derive(Error, Debug)]
pub enum Error {
    /// No cookie configured
    #[error("Cookie is not configured")]
    Auth,

    /// Network-level failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Remote payload could not be decoded
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A domain read failed
    #[error("{context}: {source}")]
    Fetch {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Remote envelope carried a non-success code
    #[error("Remote API returned code {code}: {msg}")]
    Remote { code: i64, msg: String },

    /// Remote answered with a non-2xx HTTP status
    #[error("Remote API answered HTTP {status}")]
    Status { status: u16, body: String },

    /// Nothing matched / nothing fetched yet
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad inbound request parameters
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Local file I/O
    #[error("I/O error during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Service settings problem
    #[error("Config error: {0}")]
    Config(String),

    /// Composite sign-in flow stopped at a failed claim
    #[error("Reward claim aborted: {source}")]
    ClaimAborted {
        summary: ClaimSummary,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the name of the domain read that failed
    pub fn fetch(context: impl Into<String>, source: Error) -> Self {
        Self::Fetch {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a decode error for a named payload
    pub fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { what, source }
    }

    /// Create an I/O error for a named operation
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Auth => ErrorCategory::Auth,
            Self::Transport(_) | Self::Status { .. } => ErrorCategory::Network,
            Self::Decode { .. } | Self::Remote { .. } => ErrorCategory::Data,
            Self::Fetch { source, .. } | Self::ClaimAborted { source, .. } => source.category(),
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Io { .. } => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Check if this error is recoverable (a later attempt may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable() || matches!(e, TransportError::MaxRetriesExceeded { .. }),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Fetch { source, .. } | Self::ClaimAborted { source, .. } => {
                source.is_recoverable()
            }
            Self::Io { .. } => true,
            Self::Auth
            | Self::Decode { .. }
            | Self::Remote { .. }
            | Self::NotFound(_)
            | Self::Validation(_)
            | Self::Config(_) => false,
        }
    }

    /// Innermost error, skipping `Fetch` and `ClaimAborted` wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Fetch { source, .. } | Self::ClaimAborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Partial claim summary carried by an aborted composite flow
    pub fn claim_summary(&self) -> Option<&ClaimSummary> {
        match self {
            Self::ClaimAborted { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
