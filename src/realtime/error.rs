//! Error types for the webhook handlers.

use thiserror::Error;

use crate::ErrorKind;
use crate::signing::TokenError;

/// A webhook request was rejected.
///
/// Handlers never return this to their caller: it is turned into a `403`
/// outcome and handed to the error callback, if any.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The verify token of a verification request did not check out.
    #[error("Invalid verify token: {0}")]
    Token(#[from] TokenError),

    /// The payload signature of a notification did not match.
    #[error("Invalid signature in payload")]
    SignatureMismatch,
}

impl HandlerError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Handler
    }
}

/// Error returned by an error callback. It is logged and discarded.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
