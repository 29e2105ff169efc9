//! Tests for response parsing.

use super::{GraphError, Payload};
use serde_json::json;

mod parse {
    use super::*;

    #[test]
    fn json_bodies_are_parsed() {
        let payload = Payload::parse(br#"{"id":"42"}"#).unwrap();
        assert_eq!(payload, Payload::Json(json!({"id": "42"})));
    }

    #[test]
    fn non_json_bodies_are_kept_as_text() {
        let payload = Payload::parse(b"access_token=abc&expires=60").unwrap();
        assert_eq!(payload.as_text(), Some("access_token=abc&expires=60"));
        assert_eq!(payload.as_json(), None);
    }

    #[test]
    fn bare_scalars_are_json() {
        assert!(Payload::parse(b"false").unwrap().is_false());
        assert!(!Payload::parse(b"true").unwrap().is_false());
        assert!(!Payload::parse(b"\"false\"").unwrap().is_false());
    }

    #[test]
    fn oauth_exception_is_auth_error() {
        let err = Payload::parse(
            br#"{"error":{"message":"Error validating access token","type":"OAuthException","code":190}}"#,
        )
        .unwrap_err();

        assert!(matches!(err, GraphError::Auth { .. }));
        assert!(err.is_remote());
        assert_eq!(err.message(), Some("Error validating access token"));
        assert_eq!(err.code(), Some(190));
    }

    #[test]
    fn other_errors_are_remote_errors() {
        let err = Payload::parse(
            br#"{"error":{"message":"Unsupported get request","type":"GraphMethodException","code":100}}"#,
        )
        .unwrap_err();

        assert!(matches!(err, GraphError::Remote { code: Some(100), .. }));
    }

    #[test]
    fn error_without_code_has_none() {
        let err = Payload::parse(br#"{"error":{"message":"boom"}}"#).unwrap_err();

        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn legacy_error_msg_is_remote_error() {
        let err = Payload::parse(br#"{"error_code":1,"error_msg":"An unknown error occurred"}"#)
            .unwrap_err();

        assert!(matches!(err, GraphError::Remote { code: Some(1), .. }));
        assert_eq!(err.to_string(), "[1] An unknown error occurred");
    }
}

mod accessors {
    use super::*;

    #[test]
    fn next_page_url_reads_paging_next() {
        let payload = Payload::Json(json!({
            "data": [],
            "paging": {"next": "https://graph.example.com/me/friends?after=abc"}
        }));

        assert_eq!(
            payload.next_page_url(),
            Some("https://graph.example.com/me/friends?after=abc")
        );
    }

    #[test]
    fn next_page_url_absent_without_paging() {
        assert_eq!(Payload::Json(json!({"data": []})).next_page_url(), None);
        assert_eq!(Payload::Json(json!([1, 2])).next_page_url(), None);
        assert_eq!(Payload::Text("x".into()).next_page_url(), None);
    }

    #[test]
    fn empty_values() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(Payload::is_empty_value(&value), "{value} should be empty");
        }
        for value in [json!(true), json!(1), json!("a"), json!([0]), json!({"a": 1})] {
            assert!(!Payload::is_empty_value(&value), "{value} should not be empty");
        }
    }
}
