//! Tests for HTTP request/response types.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, Params, RequestBody, Upload};

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let url = url::Url::parse("https://graph.example.com/me").unwrap();
        let req = HttpRequest::new(http::Method::PUT, url.clone());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, url);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn shorthand_constructors_set_method() {
        let url = url::Url::parse("https://graph.example.com/").unwrap();

        assert_eq!(HttpRequest::get(url.clone()).method, http::Method::GET);
        assert_eq!(HttpRequest::post(url.clone()).method, http::Method::POST);
        assert_eq!(HttpRequest::delete(url).method, http::Method::DELETE);
    }

    #[test]
    fn with_body_sets_body() {
        let url = url::Url::parse("https://graph.example.com/").unwrap();
        let req = HttpRequest::post(url).with_body(b"a=1".to_vec());

        assert_eq!(req.body, Some(RequestBody::Bytes(b"a=1".to_vec())));
        assert_eq!(req.body.as_ref().and_then(RequestBody::as_bytes), Some(&b"a=1"[..]));
    }

    #[test]
    fn with_multipart_keeps_parts_structured() {
        let url = url::Url::parse("https://graph.example.com/").unwrap();
        let params = Params::new().with("source", Upload::new("a.jpg", b"x".to_vec()));
        let req = HttpRequest::post(url).with_multipart(params.clone());

        let body = req.body.as_ref().unwrap();
        assert_eq!(body.as_multipart(), Some(&params));
        assert_eq!(body.as_bytes(), None);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn with_header_appends_multiple_values_for_same_name() {
        let url = url::Url::parse("https://graph.example.com/").unwrap();
        let req = HttpRequest::get(url)
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/html"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn header_str_reads_valid_values() {
        let url = url::Url::parse("https://graph.example.com/").unwrap();
        let req = HttpRequest::post(url).with_header(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        assert_eq!(
            req.header_str(http::header::CONTENT_TYPE),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(req.header_str(http::header::ACCEPT), None);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn ok_builds_success_response() {
        let resp = HttpResponse::ok("{}");

        assert_eq!(resp.status, http::StatusCode::OK);
        assert!(resp.is_success());
        assert_eq!(resp.body_text(), Some("{}"));
    }

    #[test]
    fn is_success_false_for_errors() {
        for status in [
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::FORBIDDEN,
            http::StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), vec![]);
            assert!(!resp.is_success(), "{status} should not be success");
        }
    }

    #[test]
    fn body_text_none_for_invalid_utf8() {
        let resp = HttpResponse::ok(vec![0xff, 0xfe]);

        assert!(resp.body_text().is_none());
    }
}

mod http_client_impls {
    use super::*;
    use std::sync::Arc;

    struct Fixed;

    impl HttpClient for Fixed {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse::ok("true"))
        }
    }

    #[tokio::test]
    async fn references_and_arcs_delegate() {
        let url = url::Url::parse("https://graph.example.com/").unwrap();
        let client = Fixed;

        let by_ref = (&client).request(HttpRequest::get(url.clone())).await;
        let by_arc = Arc::new(Fixed).request(HttpRequest::get(url)).await;

        assert_eq!(by_ref.unwrap().body, b"true");
        assert_eq!(by_arc.unwrap().body, b"true");
    }
}
