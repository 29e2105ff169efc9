//! Tests for batch requests.

use super::mock::{MockClient, form_of, value_of};
use super::{BatchRequest, GraphClient, GraphError, Params};
use crate::ErrorKind;
use http::Method;
use serde_json::{Value, json};

fn graph(mock: &MockClient) -> GraphClient<&MockClient> {
    GraphClient::new(mock).with_base_url(url::Url::parse("https://graph.example.com").unwrap())
}

fn batch_response(items: &Value) -> String {
    items.to_string()
}

mod encoding {
    use super::*;

    #[tokio::test]
    async fn posts_subrequests_as_json_under_batch() {
        let mock = MockClient::json(&["[]"]);
        let requests = vec![
            BatchRequest::get("me"),
            BatchRequest::new(Method::POST, "me/feed")
                .with_body(Params::new().with("message", "Hello world")),
        ];

        graph(&mock).batch(requests).await.unwrap();

        let request = mock.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/");

        let form = form_of(&request);
        let batch: Value = serde_json::from_str(value_of(&form, "batch").unwrap()).unwrap();
        assert_eq!(
            batch,
            json!([
                {"method": "GET", "relative_url": "me"},
                {"method": "POST", "relative_url": "me/feed", "body": "message=Hello+world"}
            ])
        );
    }
}

mod results {
    use super::*;

    #[tokio::test]
    async fn yields_one_entry_per_subrequest_in_order() {
        let body = batch_response(&json!([
            {"code": 200, "body": "{\"id\":\"1\"}"},
            null,
            {"code": 400, "body": "{\"error\":{\"message\":\"bad\",\"type\":\"OAuthException\",\"code\":190}}"},
            {"code": 200, "body": "{\"id\":\"4\"}"}
        ]));
        let mock = MockClient::json(&[body.as_str()]);
        let requests = vec![
            BatchRequest::get("1"),
            BatchRequest::get("2"),
            BatchRequest::get("3"),
            BatchRequest::get("4"),
        ];

        let results = graph(&mock).batch(requests).await.unwrap();

        assert_eq!(results.len(), 4);
        let first = results[0].as_ref().unwrap().as_ref().unwrap();
        assert_eq!(first.as_json().unwrap()["id"], "1");

        assert!(results[1].is_none());

        let failure = results[2].as_ref().unwrap().as_ref().unwrap_err();
        assert_eq!(failure.request.relative_url, "3");
        assert_eq!(failure.kind(), ErrorKind::Auth);
        assert!(matches!(failure.error, GraphError::Auth { code: Some(190), .. }));

        let last = results[3].as_ref().unwrap().as_ref().unwrap();
        assert_eq!(last.as_json().unwrap()["id"], "4");
    }

    #[tokio::test]
    async fn falsy_subresponses_are_none() {
        let body = batch_response(&json!([false, 0, "", {}, []]));
        let mock = MockClient::json(&[body.as_str()]);
        let requests = (0..5).map(|i| BatchRequest::get(i.to_string())).collect();

        let results = graph(&mock).batch(requests).await.unwrap();

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(Option::is_none));
    }

    #[tokio::test]
    async fn non_list_response_is_remote_error() {
        let mock = MockClient::json(&[r#"{"unexpected":true}"#]);

        let err = graph(&mock).batch(vec![BatchRequest::get("me")]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Remote);
    }

    #[tokio::test]
    async fn batch_call_is_not_retried() {
        let mock = MockClient::always_failing(3);

        let err = graph(&mock).batch(vec![BatchRequest::get("me")]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(mock.calls(), 1);
    }
}
