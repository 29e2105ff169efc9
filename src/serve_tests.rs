//! Tests for the webhook receiver server.

use super::*;
use graphlink::config::Cli;
use graphlink::signing::VerifyTokens;
use http::StatusCode;

const SECRET: &str = "<app secret>";
const SHA1_SIGNATURE: &str = "sha1=9c1603f6f4da3ff063dff0692c0fe02f1b5b990a";

fn config(args: &[&str]) -> ValidatedConfig {
    let mut full_args = vec!["graphlink", "--app-secret", SECRET, "serve"];
    full_args.extend(args);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(full_args), None).unwrap()
}

/// Serves the router on an ephemeral port and returns its base URL.
async fn spawn(path: &str) -> String {
    let config = config(&["--path", path]);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(config.app_secret, &config.server);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}{path}")
}

fn with_hub_params(url: &str, token: &str) -> url::Url {
    url::Url::parse_with_params(
        url,
        [
            ("hub.mode", "subscribe"),
            ("hub.challenge", "abc123"),
            ("hub.verify_token", token),
        ],
    )
    .unwrap()
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

mod verification {
    use super::*;

    #[tokio::test]
    async fn fresh_token_echoes_challenge() {
        let url = spawn("/realtime").await;
        let token = VerifyTokens::new(SECRET).issue(b"<token>");

        let response = client()
            .get(with_hub_params(&url, &token))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain"
        );
        assert_eq!(response.text().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn forged_token_is_forbidden() {
        let url = spawn("/realtime").await;
        let token = VerifyTokens::new("another secret").issue(b"<token>");

        let response = client()
            .get(with_hub_params(&url, &token))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get("content-type").is_none());
        assert_eq!(response.text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_parameters_are_unprocessable() {
        let url = spawn("/realtime").await;

        let response = client().get(&url).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod notification {
    use super::*;

    #[tokio::test]
    async fn valid_signature_is_accepted() {
        let url = spawn("/hook").await;

        let response = client()
            .post(&url)
            .header("X-Hub-Signature", SHA1_SIGNATURE)
            .body("<payload>")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn tampered_body_is_forbidden() {
        let url = spawn("/hook").await;

        let response = client()
            .post(&url)
            .header("X-Hub-Signature", SHA1_SIGNATURE)
            .body("<payload>!")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_signature_is_unprocessable() {
        let url = spawn("/hook").await;

        let response = client().post(&url).body("<payload>").send().await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn other_paths_are_not_served() {
        let url = spawn("/realtime").await;
        let other = url.replace("/realtime", "/elsewhere");

        let response = client().get(&other).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod serve_error {
    use super::*;

    #[tokio::test]
    async fn occupied_address_fails_to_bind() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let result = serve(config(&["--bind", &addr])).await;

        assert!(matches!(result, Err(ServeError::Bind { .. })));
    }
}
