//! Error types for signed payloads and verify tokens.

use thiserror::Error;

use crate::ErrorKind;

/// Error decoding or encoding a signed request.
///
/// Decoding is deterministic, so none of these errors are worth retrying.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The signed request is not `signature.payload`, or a half is not
    /// valid base64url, or the payload is not JSON.
    #[error("Corrupt payload: {0}")]
    Malformed(String),

    /// The payload declares a different signing algorithm.
    #[error("Unknown algorithm {found:?}, expected {expected}")]
    UnknownAlgorithm {
        /// Algorithm named in the payload, if any
        found: Option<String>,
        /// Algorithm the verifier accepts
        expected: String,
    },

    /// The signature does not match the payload.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// The payload could not be serialized to JSON.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl CodecError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Serialize(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::Codec,
        }
    }
}

/// Error decoding a signed verify token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token does not decode to `token+timestamp@signature`.
    #[error("Malformed signed token")]
    Malformed,

    /// The embedded timestamp is too far from the current time.
    #[error("Invalid time in token: {age}s away from now (max {max_age}s)")]
    ExpiredOrFuture {
        /// Signed distance `now - timestamp` in seconds
        age: i64,
        /// Largest accepted absolute distance in seconds
        max_age: u64,
    },

    /// The embedded signature does not match the token and timestamp.
    #[error("Signed token signature mismatch")]
    SignatureMismatch,
}

impl TokenError {
    /// Short machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::ExpiredOrFuture { .. } => "expired_or_future",
            Self::SignatureMismatch => "signature_mismatch",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Token
    }
}
