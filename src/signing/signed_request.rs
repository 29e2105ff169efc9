//! Signed requests: HMAC-SHA256 signed, base64url-encoded JSON envelopes.
//!
//! Wire format: `base64url(signature) + "." + base64url(json)`, where the
//! signature is `HMAC-SHA256(secret, base64url(json))`. The payload names its
//! signing scheme in an `algorithm` field.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use hmac::Mac;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::secret::HmacSha256;
use super::{AppSecret, CodecError, URL_SAFE_LENIENT};

/// Algorithm name carried by payloads this codec produces.
pub const HMAC_SHA256: &str = "HMAC-SHA256";

/// Encoder and verifier for signed requests.
///
/// # Example
///
/// ```
/// use graphlink::signing::SignedRequest;
/// use serde_json::json;
///
/// let codec = SignedRequest::new("app-secret");
/// let signed = codec
///     .encode(&json!({"algorithm": "HMAC-SHA256", "user_id": "1"}))
///     .unwrap();
///
/// let payload = codec.decode(&signed).unwrap();
/// assert_eq!(payload["user_id"], "1");
/// ```
#[derive(Debug, Clone)]
pub struct SignedRequest {
    secret: AppSecret,
}

impl SignedRequest {
    /// Creates a codec keyed with the application secret.
    #[must_use]
    pub fn new(secret: impl Into<AppSecret>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn sign(&self, encoded_payload: &[u8]) -> HmacSha256 {
        let mut mac: HmacSha256 = self.secret.mac();
        mac.update(encoded_payload);
        mac
    }

    /// Encodes `payload` as compact JSON and signs it.
    ///
    /// The payload is emitted as given; callers include the `algorithm`
    /// field themselves so that [`SignedRequest::decode`] accepts it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialize`] if the payload cannot be represented as JSON.
    pub fn encode<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, CodecError> {
        let json = serde_json::to_vec(payload).map_err(CodecError::Serialize)?;
        let encoded_payload = URL_SAFE.encode(json);
        let signature = self.sign(encoded_payload.as_bytes()).finalize().into_bytes();
        let encoded_signature = URL_SAFE.encode(signature);

        Ok(format!("{encoded_signature}.{encoded_payload}"))
    }

    /// Decodes and verifies a signed request using [`HMAC_SHA256`].
    ///
    /// # Errors
    ///
    /// See [`SignedRequest::decode_with_algorithm`].
    pub fn decode(&self, signed_request: &str) -> Result<Value, CodecError> {
        self.decode_with_algorithm(signed_request, HMAC_SHA256)
    }

    /// Decodes and verifies a signed request, requiring the payload to name
    /// `expected_algorithm` (compared case-insensitively).
    ///
    /// # Errors
    ///
    /// - [`CodecError::Malformed`] if the envelope, base64 or JSON is invalid
    /// - [`CodecError::UnknownAlgorithm`] if the declared algorithm differs
    /// - [`CodecError::SignatureMismatch`] if the signature does not verify
    pub fn decode_with_algorithm(
        &self,
        signed_request: &str,
        expected_algorithm: &str,
    ) -> Result<Value, CodecError> {
        let mut parts = signed_request.split('.');
        let (Some(encoded_signature), Some(encoded_payload), None) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(CodecError::Malformed(
                "expected exactly one '.' separator".to_string(),
            ));
        };

        let signature = URL_SAFE_LENIENT
            .decode(encoded_signature)
            .map_err(|e| CodecError::Malformed(format!("signature: {e}")))?;
        let json = URL_SAFE_LENIENT
            .decode(encoded_payload)
            .map_err(|e| CodecError::Malformed(format!("payload: {e}")))?;
        let payload: Value = serde_json::from_slice(&json)
            .map_err(|e| CodecError::Malformed(format!("payload: {e}")))?;

        let declared = payload.get("algorithm").and_then(Value::as_str);
        if !declared.is_some_and(|name| name.eq_ignore_ascii_case(expected_algorithm)) {
            return Err(CodecError::UnknownAlgorithm {
                found: declared.map(ToString::to_string),
                expected: expected_algorithm.to_string(),
            });
        }

        self.sign(encoded_payload.as_bytes())
            .verify_slice(&signature)
            .map_err(|_| CodecError::SignatureMismatch)?;

        Ok(payload)
    }

    /// Decodes and verifies a signed request into a typed payload.
    ///
    /// # Errors
    ///
    /// Same as [`SignedRequest::decode`], plus [`CodecError::Malformed`] if the
    /// verified payload does not deserialize into `T`.
    pub fn decode_as<T: DeserializeOwned>(&self, signed_request: &str) -> Result<T, CodecError> {
        let payload = self.decode(signed_request)?;
        serde_json::from_value(payload).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}
