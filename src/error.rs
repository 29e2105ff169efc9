//! Crate-wide error classification.
//!
//! Each layer owns its own error enum; [`ErrorKind`] is the shared tag those
//! enums report through their `kind()` accessors so callers can branch on the
//! class of failure without matching every variant.

use std::fmt;

/// Classification of every failure the crate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transport failed before a response was received.
    Transport,
    /// The API answered, but the payload describes an application-level failure.
    Remote,
    /// An OAuth failure reported by the API. Also a [`ErrorKind::Remote`] failure.
    Auth,
    /// A signed request was malformed, used the wrong algorithm, or did not verify.
    Codec,
    /// A verify token was malformed, out of its age window, or did not verify.
    Token,
    /// A webhook handler rejected the inbound request.
    Handler,
    /// The caller supplied input that can never succeed (bad URL, unsupported type).
    InvalidInput,
}

impl ErrorKind {
    /// Returns true for failures reported by the remote API, including OAuth failures.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Remote | Self::Auth)
    }

    /// Returns true for kinds that a fresh attempt may resolve.
    ///
    /// Cryptographic verification failures are deterministic and never retried.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transport | Self::Remote | Self::Auth)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Remote => "remote",
            Self::Auth => "auth",
            Self::Codec => "codec",
            Self::Token => "token",
            Self::Handler => "handler",
            Self::InvalidInput => "invalid input",
        };
        f.write_str(name)
    }
}
