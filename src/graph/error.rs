//! Error types for Graph API operations.

use thiserror::Error;

use crate::ErrorKind;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This indicates a caller error rather than a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded, e.g. an upload with an
    /// unparseable content type.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

/// Error type for Graph API queries.
///
/// [`GraphError::Auth`] is a specialization of [`GraphError::Remote`]:
/// [`GraphError::is_remote`] is true for both.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The transport failed before a response was parsed.
    #[error("HTTP error: {0}")]
    Transport(#[from] HttpError),

    /// The API reported an application-level failure.
    #[error("{}", describe(.message, *.code))]
    Remote {
        /// Message reported by the API
        message: String,
        /// Numeric error code reported by the API, if any
        code: Option<i64>,
    },

    /// The API reported an OAuth failure.
    #[error("{}", describe(.message, *.code))]
    Auth {
        /// Message reported by the API
        message: String,
        /// Numeric error code reported by the API, if any
        code: Option<i64>,
    },

    /// The request can never succeed as built (bad path, unsupported option).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn describe(message: &str, code: Option<i64>) -> String {
    code.map_or_else(|| message.to_string(), |code| format!("[{code}] {message}"))
}

impl GraphError {
    /// Creates a [`GraphError::Remote`] without a code.
    #[must_use]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a [`GraphError::Auth`] without a code.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            code: None,
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(HttpError::InvalidUrl(_) | HttpError::InvalidBody(_))
            | Self::InvalidRequest(_) => {
                ErrorKind::InvalidInput
            }
            Self::Transport(_) => ErrorKind::Transport,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Auth { .. } => ErrorKind::Auth,
        }
    }

    /// Returns true for errors reported by the API, including OAuth errors.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.kind().is_remote()
    }

    /// Returns the API-provided message for remote errors.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } | Self::Auth { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the API-provided code for remote errors.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Remote { code, .. } | Self::Auth { code, .. } => *code,
            _ => None,
        }
    }
}

/// Extension trait for checking if an error is retryable.
///
/// Determines whether an error represents a transient failure that
/// warrants re-issuing the request.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            Self::Connection(_) | Self::Timeout => true,
            // URL and body errors are caller issues, not transient
            Self::InvalidUrl(_) | Self::InvalidBody(_) => false,
        }
    }
}

impl IsRetryable for GraphError {
    fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
