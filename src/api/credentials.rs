//! Application credentials.

use url::Url;

use crate::graph::GraphClient;
use crate::signing::AppSecret;

/// The immutable credentials bundle shared by the API wrappers.
///
/// The secret is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    app_id: String,
    app_secret: AppSecret,
    access_token: Option<String>,
}

impl Credentials {
    /// Creates credentials without an access token.
    #[must_use]
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<AppSecret>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            access_token: None,
        }
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Returns the application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the application secret.
    #[must_use]
    pub const fn app_secret(&self) -> &AppSecret {
        &self.app_secret
    }

    /// Returns the access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Builds a Graph client over `http` that authenticates with these
    /// credentials' access token.
    #[must_use]
    pub fn client<H>(&self, http: H, base_url: Url) -> GraphClient<H> {
        let client = GraphClient::new(http).with_base_url(base_url);
        match &self.access_token {
            Some(token) => client.with_access_token(token.as_str()),
            None => client,
        }
    }
}
