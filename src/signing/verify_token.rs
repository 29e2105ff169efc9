//! Timestamped, HMAC-SHA1 signed verify tokens.
//!
//! A verify token is handed to the platform when a subscription is created
//! and echoed back in the verification handshake. The signed form is
//! `base64url("{token}+{timestamp}@{signature}")` without `=` padding, where
//! `signature = HMAC-SHA1(secret, "{token}+{timestamp}")`. The timestamp is
//! bound into the signature, so a verifier needs no state to reject replays
//! outside the accepted age window.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::Mac;

use super::secret::HmacSha1;
use super::{AppSecret, TokenError, URL_SAFE_LENIENT};
use crate::time::{Clock, SystemClock};

/// Length in bytes of the raw HMAC-SHA1 signature.
const SIGNATURE_LEN: usize = 20;

/// Largest accepted distance between a token's timestamp and now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxAge {
    /// Accept timestamps at most this many seconds in the past or future.
    Seconds(u64),
    /// Accept any timestamp.
    Unbounded,
}

impl MaxAge {
    /// Default window of 30 seconds.
    pub const DEFAULT: Self = Self::Seconds(30);

    /// Returns true if a token `age` seconds old (negative for future-dated)
    /// falls inside this window. The boundary itself is accepted.
    #[must_use]
    pub const fn admits(self, age: i64) -> bool {
        match self {
            Self::Seconds(max) => age.unsigned_abs() <= max,
            Self::Unbounded => true,
        }
    }
}

impl Default for MaxAge {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MaxAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{secs}s"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

fn timestamped(token: &[u8], timestamp: i64) -> Vec<u8> {
    let mut message = token.to_vec();
    message.push(b'+');
    message.extend_from_slice(timestamp.to_string().as_bytes());
    message
}

fn sign(secret: &AppSecret, message: &[u8]) -> HmacSha1 {
    let mut mac: HmacSha1 = secret.mac();
    mac.update(message);
    mac
}

/// Signs `token` together with `timestamp` (seconds since the epoch).
///
/// # Example
///
/// ```
/// use graphlink::signing::{AppSecret, encode_token};
///
/// let secret = AppSecret::from("<app secret>");
/// let signed = encode_token(&secret, b"<token>", 1_234_567_890);
/// assert_eq!(signed, "PHRva2VuPisxMjM0NTY3ODkwQFy4wfO2tbXyLltUUusqT2yeJfCr");
/// ```
#[must_use]
pub fn encode_token(secret: &AppSecret, token: &[u8], timestamp: i64) -> String {
    let mut message = timestamped(token, timestamp);
    let signature = sign(secret, &message).finalize().into_bytes();

    message.push(b'@');
    message.extend_from_slice(&signature);
    URL_SAFE_NO_PAD.encode(message)
}

/// Verifies a signed token against `now` and returns the original token bytes.
///
/// The signature occupies the fixed-width tail after the last `@`; the token
/// is everything before the last `+` of the remaining prefix, so tokens may
/// themselves contain `+` or `@`.
///
/// # Errors
///
/// - [`TokenError::Malformed`] if the token does not decode and split
/// - [`TokenError::ExpiredOrFuture`] if the timestamp is outside `max_age`
/// - [`TokenError::SignatureMismatch`] if the signature does not verify
pub fn decode_token(
    secret: &AppSecret,
    signed_token: &str,
    max_age: MaxAge,
    now: i64,
) -> Result<Vec<u8>, TokenError> {
    let decoded = URL_SAFE_LENIENT
        .decode(signed_token)
        .map_err(|_| TokenError::Malformed)?;

    let split_at = decoded
        .len()
        .checked_sub(SIGNATURE_LEN + 1)
        .filter(|&at| decoded[at] == b'@')
        .ok_or(TokenError::Malformed)?;
    let (message, signature) = (&decoded[..split_at], &decoded[split_at + 1..]);

    let plus = message
        .iter()
        .rposition(|&b| b == b'+')
        .ok_or(TokenError::Malformed)?;
    let (token, raw_timestamp) = (&message[..plus], &message[plus + 1..]);

    let timestamp: i64 = std::str::from_utf8(raw_timestamp)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(TokenError::Malformed)?;

    let age = now.saturating_sub(timestamp);
    if !max_age.admits(age) {
        return Err(TokenError::ExpiredOrFuture {
            age,
            max_age: match max_age {
                MaxAge::Seconds(secs) => secs,
                MaxAge::Unbounded => u64::MAX,
            },
        });
    }

    // Only the canonical rendering of the timestamp re-encodes to the same token.
    if raw_timestamp != timestamp.to_string().as_bytes() {
        return Err(TokenError::SignatureMismatch);
    }

    sign(secret, message)
        .verify_slice(signature)
        .map_err(|_| TokenError::SignatureMismatch)?;

    Ok(token.to_vec())
}

/// Issues and verifies verify tokens with a fixed secret, clock and age window.
///
/// # Example
///
/// ```
/// use graphlink::signing::VerifyTokens;
/// use graphlink::time::FixedClock;
///
/// let tokens = VerifyTokens::new("<app secret>").with_clock(FixedClock::at(1_234_567_890));
/// let signed = tokens.issue(b"<token>");
///
/// assert_eq!(tokens.verify(&signed).unwrap(), b"<token>");
/// ```
#[derive(Debug, Clone)]
pub struct VerifyTokens<C = SystemClock> {
    secret: AppSecret,
    clock: C,
    max_age: MaxAge,
}

impl VerifyTokens<SystemClock> {
    /// Creates a token codec using the system clock and the default 30s window.
    #[must_use]
    pub fn new(secret: impl Into<AppSecret>) -> Self {
        Self {
            secret: secret.into(),
            clock: SystemClock,
            max_age: MaxAge::DEFAULT,
        }
    }
}

impl<C> VerifyTokens<C> {
    /// Replaces the clock used for issuing and verifying.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> VerifyTokens<C2> {
        VerifyTokens {
            secret: self.secret,
            clock,
            max_age: self.max_age,
        }
    }

    /// Sets the accepted age window.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: MaxAge) -> Self {
        self.max_age = max_age;
        self
    }

    /// Returns the accepted age window.
    #[must_use]
    pub const fn max_age(&self) -> MaxAge {
        self.max_age
    }
}

impl<C: Clock> VerifyTokens<C> {
    /// Signs `token` with the current time.
    #[must_use]
    pub fn issue(&self, token: &[u8]) -> String {
        encode_token(&self.secret, token, self.clock.unix_seconds())
    }

    /// Verifies a signed token against the current time.
    ///
    /// # Errors
    ///
    /// See [`decode_token`].
    pub fn verify(&self, signed_token: &str) -> Result<Vec<u8>, TokenError> {
        decode_token(
            &self.secret,
            signed_token,
            self.max_age,
            self.clock.unix_seconds(),
        )
    }
}
