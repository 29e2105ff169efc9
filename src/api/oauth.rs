//! Application and extended access tokens.

use serde_json::Value;
use url::Url;

use crate::graph::{GraphClient, GraphError, HttpClient, Params, Payload};
use crate::signing::AppSecret;
use crate::time::{Clock, SystemClock};

const TOKEN_PATH: &str = "oauth/access_token";

/// A long-lived access token and when it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedToken {
    /// The exchanged access token
    pub access_token: String,
    /// Expiry, in seconds since the Unix epoch
    pub expires_at: i64,
}

/// Obtains access tokens from the OAuth endpoint.
///
/// Token requests are never authenticated with an existing access token, so
/// this type builds its own unauthenticated [`GraphClient`].
#[derive(Debug, Clone)]
pub struct OAuth<H, C = SystemClock> {
    graph: GraphClient<H>,
    clock: C,
}

impl<H> OAuth<H, SystemClock> {
    /// Creates a token client over `http` for the default API URL.
    #[must_use]
    pub fn new(http: H) -> Self {
        Self {
            graph: GraphClient::new(http),
            clock: SystemClock,
        }
    }
}

impl<H, C> OAuth<H, C> {
    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.graph = self.graph.with_base_url(base_url);
        self
    }

    /// Replaces the clock used to compute expiry times.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> OAuth<H, C2> {
        OAuth {
            graph: self.graph,
            clock,
        }
    }
}

impl<H: HttpClient, C: Clock> OAuth<H, C> {
    /// Requests an application access token (client credentials grant).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Auth`] if the response carries no token, or
    /// any error from the request itself.
    pub async fn application_access_token(
        &self,
        app_id: &str,
        app_secret: &AppSecret,
    ) -> Result<String, GraphError> {
        let params = client_params(app_id, app_secret).with("grant_type", "client_credentials");
        let payload = self.graph.get(TOKEN_PATH, params, 0).await?;

        field(&payload, "access_token").ok_or_else(|| GraphError::auth("No access token given"))
    }

    /// Exchanges a short-lived user token for an extended one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Auth`] if the response lacks the token or its
    /// lifetime, or any error from the request itself.
    pub async fn extended_access_token(
        &self,
        app_id: &str,
        app_secret: &AppSecret,
        access_token: &str,
    ) -> Result<ExtendedToken, GraphError> {
        let params = client_params(app_id, app_secret)
            .with("grant_type", "fb_exchange_token")
            .with("fb_exchange_token", access_token);
        let payload = self.graph.get(TOKEN_PATH, params, 0).await?;

        let missing = || GraphError::auth("No access token or expiration given");
        let access_token = field(&payload, "access_token").ok_or_else(missing)?;
        let expires: i64 = field(&payload, "expires")
            .or_else(|| field(&payload, "expires_in"))
            .and_then(|s| s.parse().ok())
            .ok_or_else(missing)?;

        Ok(ExtendedToken {
            access_token,
            expires_at: self.clock.unix_seconds().saturating_add(expires),
        })
    }
}

fn client_params(app_id: &str, app_secret: &AppSecret) -> Params {
    Params::new()
        .with("client_id", app_id)
        .with("client_secret", String::from_utf8_lossy(app_secret.expose()).into_owned())
}

/// Reads `key` from a form-encoded text body or a JSON object body.
fn field(payload: &Payload, key: &str) -> Option<String> {
    match payload {
        Payload::Text(text) => url::form_urlencoded::parse(text.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned()),
        Payload::Json(value) => match value.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        },
    }
}
