//! Signing layer: signed requests and verify tokens.
//!
//! This module provides:
//! - Application secret handling ([`AppSecret`])
//! - HMAC-SHA256 signed JSON envelopes ([`SignedRequest`])
//! - Timestamped HMAC-SHA1 verify tokens ([`encode_token`], [`decode_token`], [`VerifyTokens`])
//!
//! Both codecs are pure functions of their inputs; failures are never retryable.

mod error;
mod secret;
mod signed_request;
mod verify_token;


use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

pub use error::{CodecError, TokenError};
pub use secret::AppSecret;
pub(crate) use secret::{HmacSha1, HmacSha256};
pub use signed_request::{HMAC_SHA256, SignedRequest};
pub use verify_token::{MaxAge, VerifyTokens, decode_token, encode_token};

/// URL-safe base64 decoder accepting input with or without `=` padding.
pub(crate) const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);
