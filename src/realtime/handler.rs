//! Webhook verification and notification handlers.

use std::fmt;
use std::str::FromStr;

use hmac::Mac;
use http::StatusCode;
use tracing::debug;

use super::dispatch::{Callbacks, HandlerOutcome, Reply, dispatch};
use super::HandlerError;
use crate::signing::{AppSecret, HmacSha1, HmacSha256, MaxAge, VerifyTokens};
use crate::time::{Clock, SystemClock};

/// The only verification mode the platform uses.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// HMAC algorithms accepted in `X-Hub-Signature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubAlgorithm {
    /// HMAC-SHA1, what the platform sends.
    Sha1,
    /// HMAC-SHA256.
    Sha256,
}

impl HubAlgorithm {
    /// Returns the name used in signature headers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Returns true if `digest` is the HMAC of `payload` under `secret`.
    ///
    /// The comparison runs in constant time.
    #[must_use]
    pub fn verify(self, secret: &AppSecret, payload: &[u8], digest: &[u8]) -> bool {
        match self {
            Self::Sha1 => {
                let mut mac: HmacSha1 = secret.mac();
                mac.update(payload);
                mac.verify_slice(digest).is_ok()
            }
            Self::Sha256 => {
                let mut mac: HmacSha256 = secret.mac();
                mac.update(payload);
                mac.verify_slice(digest).is_ok()
            }
        }
    }

    /// Returns the lowercase hex HMAC of `payload` under `secret`.
    #[must_use]
    pub fn sign(self, secret: &AppSecret, payload: &[u8]) -> String {
        match self {
            Self::Sha1 => {
                let mut mac: HmacSha1 = secret.mac();
                mac.update(payload);
                hex::encode(mac.finalize().into_bytes())
            }
            Self::Sha256 => {
                let mut mac: HmacSha256 = secret.mac();
                mac.update(payload);
                hex::encode(mac.finalize().into_bytes())
            }
        }
    }
}

impl fmt::Display for HubAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HubAlgorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(()),
        }
    }
}

/// A subscription verification request (`GET` with `hub.*` parameters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// `hub.mode`
    pub mode: String,
    /// `hub.challenge`, echoed back on success
    pub challenge: String,
    /// `hub.verify_token`, the signed token sent when subscribing
    pub verify_token: String,
}

impl Verification {
    /// Creates a verification request.
    #[must_use]
    pub fn new(
        mode: impl Into<String>,
        challenge: impl Into<String>,
        verify_token: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            challenge: challenge.into(),
            verify_token: verify_token.into(),
        }
    }
}

/// A change notification (`POST` with a signed body).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    /// Raw request body, exactly as received
    pub payload: Vec<u8>,
    /// `X-Hub-Signature` header value, `algorithm=hexdigest`
    pub signature: Option<String>,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(payload: impl Into<Vec<u8>>, signature: Option<String>) -> Self {
        Self {
            payload: payload.into(),
            signature,
        }
    }
}

/// Stateless handler for inbound webhook requests.
///
/// Both entry points always produce a [`HandlerOutcome`]; rejections
/// surface as a status code, never as an error.
///
/// # Example
///
/// ```
/// use graphlink::realtime::{Notification, WebhookHandler};
///
/// let handler = WebhookHandler::new("<app secret>");
/// let notification = Notification::new(
///     b"<payload>".to_vec(),
///     Some("sha1=9c1603f6f4da3ff063dff0692c0fe02f1b5b990a".to_string()),
/// );
///
/// let (status, body, content_type, success, error) = handler.notification(&notification).into_parts();
/// assert_eq!(status, 200);
/// assert!(body.is_none() && content_type.is_none() && success.is_none() && error.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct WebhookHandler<C = SystemClock> {
    secret: AppSecret,
    tokens: VerifyTokens<C>,
}

impl WebhookHandler<SystemClock> {
    /// Creates a handler with the system clock and a 30 second token window.
    #[must_use]
    pub fn new(secret: impl Into<AppSecret>) -> Self {
        let secret = secret.into();
        Self {
            tokens: VerifyTokens::new(secret.clone()),
            secret,
        }
    }
}

impl<C> WebhookHandler<C> {
    /// Sets how old (or how far in the future) a verify token may be.
    #[must_use]
    pub fn with_max_age(mut self, max_age: MaxAge) -> Self {
        self.tokens = self.tokens.with_max_age(max_age);
        self
    }

    /// Replaces the clock used to check token age.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> WebhookHandler<C2> {
        WebhookHandler {
            secret: self.secret,
            tokens: self.tokens.with_clock(clock),
        }
    }

    /// Returns the accepted verify-token age window.
    #[must_use]
    pub const fn max_age(&self) -> MaxAge {
        self.tokens.max_age()
    }
}

impl<C: Clock> WebhookHandler<C> {
    /// Answers a subscription verification request.
    ///
    /// - mode other than `subscribe`: `422`
    /// - verify token malformed, out of window or forged: `403`
    /// - otherwise `200` echoing the challenge as `text/plain`
    #[must_use]
    pub fn verification(&self, request: &Verification) -> HandlerOutcome {
        self.verification_with(request, &Callbacks::new())
    }

    /// [`WebhookHandler::verification`] with callbacks.
    #[must_use]
    pub fn verification_with<S, E>(
        &self,
        request: &Verification,
        callbacks: &Callbacks<Verification, S, E>,
    ) -> HandlerOutcome<S, E> {
        dispatch(request, callbacks, |request| self.verify(request))
    }

    /// Checks the signature of a change notification.
    ///
    /// - signature missing, empty, not `algorithm=digest`, or using an
    ///   algorithm other than `sha1`/`sha256`: `422`
    /// - digest does not match the payload: `403`
    /// - otherwise `200`
    #[must_use]
    pub fn notification(&self, request: &Notification) -> HandlerOutcome {
        self.notification_with(request, &Callbacks::new())
    }

    /// [`WebhookHandler::notification`] with callbacks.
    #[must_use]
    pub fn notification_with<S, E>(
        &self,
        request: &Notification,
        callbacks: &Callbacks<Notification, S, E>,
    ) -> HandlerOutcome<S, E> {
        dispatch(request, callbacks, |request| self.check_signature(request))
    }

    fn verify(&self, request: &Verification) -> Result<Reply, HandlerError> {
        if request.mode != SUBSCRIBE_MODE {
            debug!(mode = %request.mode, "unsupported verification mode");
            return Ok(Reply::status(StatusCode::UNPROCESSABLE_ENTITY));
        }

        self.tokens.verify(&request.verify_token).map_err(|e| {
            debug!(reason = e.reason(), "verify token rejected");
            HandlerError::from(e)
        })?;

        Ok(Reply::text(request.challenge.as_str()))
    }

    fn check_signature(&self, request: &Notification) -> Result<Reply, HandlerError> {
        let Some((algorithm, digest)) = request
            .signature
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(split_signature)
        else {
            debug!("missing or malformed payload signature");
            return Ok(Reply::status(StatusCode::UNPROCESSABLE_ENTITY));
        };

        let Ok(algorithm) = algorithm.parse::<HubAlgorithm>() else {
            debug!(algorithm, "unsupported signature algorithm");
            return Ok(Reply::status(StatusCode::UNPROCESSABLE_ENTITY));
        };

        let digest = hex::decode(digest).map_err(|_| HandlerError::SignatureMismatch)?;
        if !algorithm.verify(&self.secret, &request.payload, &digest) {
            debug!(%algorithm, "payload signature mismatch");
            return Err(HandlerError::SignatureMismatch);
        }

        Ok(Reply::status(StatusCode::OK))
    }
}

/// Splits `algorithm=digest`; anything but exactly one `=` is malformed.
fn split_signature(signature: &str) -> Option<(&str, &str)> {
    let (algorithm, digest) = signature.split_once('=')?;
    if digest.contains('=') {
        return None;
    }
    Some((algorithm, digest))
}
