//! Tests for the webhook handler state machine.

use super::{Callbacks, HandlerError, HubAlgorithm, Notification, Verification, WebhookHandler};
use crate::signing::{AppSecret, MaxAge, TokenError, VerifyTokens};
use crate::time::FixedClock;
use http::StatusCode;

const SECRET: &str = "<app secret>";
const NOW: i64 = 1_234_567_890;
const PAYLOAD: &[u8] = b"<payload>";
const SHA1_SIGNATURE: &str = "sha1=9c1603f6f4da3ff063dff0692c0fe02f1b5b990a";
const SHA256_SIGNATURE: &str =
    "sha256=d6f29507fa1da7ccd398bc9da78eb3ca54beb17f5f66902ac146bb753d586b2c";

fn handler() -> WebhookHandler<FixedClock> {
    WebhookHandler::new(SECRET).with_clock(FixedClock::at(NOW))
}

fn token_issued_at(secs: i64) -> String {
    VerifyTokens::new(SECRET)
        .with_clock(FixedClock::at(secs))
        .issue(b"<token>")
}

fn notification(signature: Option<&str>) -> Notification {
    Notification::new(PAYLOAD.to_vec(), signature.map(ToString::to_string))
}

mod verification {
    use super::*;

    #[test]
    fn fresh_token_echoes_challenge() {
        let request = Verification::new("subscribe", "challenge-123", token_issued_at(NOW));

        let parts = handler().verification(&request).into_parts();

        assert_eq!(
            parts,
            (
                StatusCode::OK,
                Some("challenge-123".to_string()),
                Some("text/plain"),
                None,
                None
            )
        );
    }

    #[test]
    fn other_modes_are_unprocessable() {
        for mode in ["unsubscribe", "", "SUBSCRIBE"] {
            let request = Verification::new(mode, "challenge", token_issued_at(NOW));

            let parts = handler().verification(&request).into_parts();

            assert_eq!(
                parts,
                (StatusCode::UNPROCESSABLE_ENTITY, None, None, None, None),
                "mode {mode:?}"
            );
        }
    }

    #[test]
    fn unsupported_mode_skips_token_check() {
        let request = Verification::new("unsubscribe", "challenge", "garbage");
        let callbacks: Callbacks<Verification, (), &str> =
            Callbacks::new().on_error(|_, _| Ok("called"));

        let outcome = handler().verification_with(&request, &callbacks);

        assert_eq!(outcome.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn stale_token_is_forbidden() {
        let request = Verification::new("subscribe", "challenge", token_issued_at(NOW - 31));

        let outcome = handler().verification(&request);

        assert_eq!(outcome.status, StatusCode::FORBIDDEN);
        assert_eq!(outcome.body, None);
        assert_eq!(outcome.content_type, None);
    }

    #[test]
    fn token_at_window_edge_is_accepted() {
        let request = Verification::new("subscribe", "c", token_issued_at(NOW - 30));

        assert_eq!(handler().verification(&request).status, StatusCode::OK);
    }

    #[test]
    fn max_age_widens_the_window() {
        let request = Verification::new("subscribe", "c", token_issued_at(NOW - 3600));
        let handler = handler().with_max_age(MaxAge::Unbounded);

        assert_eq!(handler.max_age(), MaxAge::Unbounded);
        assert_eq!(handler.verification(&request).status, StatusCode::OK);
    }

    #[test]
    fn forged_and_malformed_tokens_are_forbidden() {
        let forged = VerifyTokens::new("another secret")
            .with_clock(FixedClock::at(NOW))
            .issue(b"<token>");

        for token in [forged.as_str(), "", "not-a-token"] {
            let request = Verification::new("subscribe", "c", token);
            assert_eq!(
                handler().verification(&request).status,
                StatusCode::FORBIDDEN,
                "token {token:?}"
            );
        }
    }

    #[test]
    fn error_callback_sees_token_error() {
        let request = Verification::new("subscribe", "c", token_issued_at(NOW + 100));
        let callbacks: Callbacks<Verification, (), HandlerError> =
            Callbacks::new().on_error(|_, e| Ok(e.clone()));

        let outcome = handler().verification_with(&request, &callbacks);

        assert!(matches!(
            outcome.error,
            Some(HandlerError::Token(TokenError::ExpiredOrFuture { .. }))
        ));
    }
}

mod notification {
    use super::*;

    #[test]
    fn valid_sha1_signature_is_accepted() {
        let parts = handler()
            .notification(&notification(Some(SHA1_SIGNATURE)))
            .into_parts();

        assert_eq!(parts, (StatusCode::OK, None, None, None, None));
    }

    #[test]
    fn valid_sha256_signature_is_accepted() {
        let outcome = handler().notification(&notification(Some(SHA256_SIGNATURE)));

        assert_eq!(outcome.status, StatusCode::OK);
    }

    #[test]
    fn uppercase_hex_digest_is_accepted() {
        let signature = SHA1_SIGNATURE.to_uppercase().replacen("SHA1", "sha1", 1);

        let outcome = handler().notification(&notification(Some(&signature)));

        assert_eq!(outcome.status, StatusCode::OK);
    }

    #[test]
    fn wrong_digest_is_forbidden() {
        let signature = "sha1=0000000000000000000000000000000000000000";

        let parts = handler().notification(&notification(Some(signature))).into_parts();

        assert_eq!(parts, (StatusCode::FORBIDDEN, None, None, None, None));
    }

    #[test]
    fn tampered_payload_is_forbidden() {
        let request = Notification::new(b"<payload >".to_vec(), Some(SHA1_SIGNATURE.to_string()));

        assert_eq!(handler().notification(&request).status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn non_hex_digest_is_forbidden() {
        let outcome = handler().notification(&notification(Some("sha1=not-hex")));

        assert_eq!(outcome.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn missing_signature_is_unprocessable() {
        for signature in [None, Some("")] {
            let outcome = handler().notification(&notification(signature));
            assert_eq!(outcome.status, StatusCode::UNPROCESSABLE_ENTITY, "{signature:?}");
        }
    }

    #[test]
    fn malformed_signature_is_unprocessable() {
        for signature in ["sha1", "sha1=abc=def", "9c1603f6f4da3ff063dff0692c0fe02f1b5b990a"] {
            let outcome = handler().notification(&notification(Some(signature)));
            assert_eq!(outcome.status, StatusCode::UNPROCESSABLE_ENTITY, "{signature}");
        }
    }

    #[test]
    fn unsupported_algorithm_is_unprocessable() {
        for signature in [
            "md5=0cc175b9c0f1b6a831c399e269772661",
            "sha512=00",
            "SHA1=9c1603f6f4da3ff063dff0692c0fe02f1b5b990a",
        ] {
            let outcome = handler().notification(&notification(Some(signature)));
            assert_eq!(outcome.status, StatusCode::UNPROCESSABLE_ENTITY, "{signature}");
        }
    }

    #[test]
    fn success_callback_receives_the_payload() {
        let callbacks: Callbacks<Notification, usize> =
            Callbacks::new().on_success(|request: &Notification| request.payload.len());

        let outcome = handler().notification_with(&notification(Some(SHA1_SIGNATURE)), &callbacks);

        assert_eq!(outcome.success, Some(PAYLOAD.len()));
        assert_eq!(outcome.error, None);
    }
}

mod hub_algorithm {
    use super::*;

    #[test]
    fn sign_matches_known_digests() {
        let secret = AppSecret::from(SECRET);

        assert_eq!(
            format!("sha1={}", HubAlgorithm::Sha1.sign(&secret, PAYLOAD)),
            SHA1_SIGNATURE
        );
        assert_eq!(
            format!("sha256={}", HubAlgorithm::Sha256.sign(&secret, PAYLOAD)),
            SHA256_SIGNATURE
        );
    }

    #[test]
    fn parses_allow_list_only() {
        assert_eq!("sha1".parse(), Ok(HubAlgorithm::Sha1));
        assert_eq!("sha256".parse(), Ok(HubAlgorithm::Sha256));
        assert!("sha384".parse::<HubAlgorithm>().is_err());
        assert!("md5".parse::<HubAlgorithm>().is_err());
    }
}
