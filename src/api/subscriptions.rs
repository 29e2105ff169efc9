//! Webhook subscription management.

use tracing::info;

use super::Credentials;
use crate::graph::{GraphClient, GraphError, HttpClient, Params, Payload};
use crate::signing::{AppSecret, VerifyTokens};
use crate::time::{Clock, SystemClock};

/// Random bytes generated when no verify token is supplied.
const GENERATED_TOKEN_LEN: usize = 8;

/// Default retries for reads and deletes.
pub const DEFAULT_RETRIES: u32 = 3;

/// Manages an application's webhook subscriptions.
///
/// Subscribing signs the verify token with the application secret, so the
/// receiving endpoint can check it statelessly with the same secret (see
/// [`crate::realtime::WebhookHandler`]).
#[derive(Debug, Clone)]
pub struct Subscriptions<H, C = SystemClock> {
    graph: GraphClient<H>,
    path: String,
    tokens: VerifyTokens<C>,
}

impl<H> Subscriptions<H, SystemClock> {
    /// Creates a manager for the given application.
    #[must_use]
    pub fn new(graph: GraphClient<H>, app_id: &str, app_secret: impl Into<AppSecret>) -> Self {
        Self {
            graph,
            path: format!("{app_id}/subscriptions"),
            tokens: VerifyTokens::new(app_secret),
        }
    }

    /// Creates a manager from a credentials bundle.
    #[must_use]
    pub fn for_app(graph: GraphClient<H>, credentials: &Credentials) -> Self {
        Self::new(graph, credentials.app_id(), credentials.app_secret().clone())
    }
}

impl<H, C> Subscriptions<H, C> {
    /// Replaces the clock used to timestamp verify tokens.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Subscriptions<H, C2> {
        Subscriptions {
            graph: self.graph,
            path: self.path,
            tokens: self.tokens.with_clock(clock),
        }
    }

    /// Returns the subscriptions collection path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<H: HttpClient, C: Clock> Subscriptions<H, C> {
    /// Lists the subscribed objects and their fields.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn list(&self, retries: u32) -> Result<Payload, GraphError> {
        self.graph.get(&self.path, Params::new(), retries).await
    }

    /// Subscribes to changes of `fields` on `object`, delivered to `callback_url`.
    ///
    /// `verify_token` defaults to 8 random bytes; either way it is signed
    /// and timestamped before being sent.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn subscribe(
        &self,
        object: &str,
        fields: &[&str],
        callback_url: &str,
        verify_token: Option<&[u8]>,
        retries: u32,
    ) -> Result<Payload, GraphError> {
        let signed = match verify_token {
            Some(token) => self.tokens.issue(token),
            None => self.tokens.issue(&rand::random::<[u8; GENERATED_TOKEN_LEN]>()),
        };

        let params = Params::new()
            .with("object", object)
            .with("fields", fields)
            .with("callback_url", callback_url)
            .with("verify_token", signed);

        let payload = self.graph.post(&self.path, params, retries).await?;
        info!(object, fields = fields.len(), "subscribed");
        Ok(payload)
    }

    /// Deletes the subscription for `object`, or every subscription if `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn unsubscribe(&self, object: Option<&str>, retries: u32) -> Result<Payload, GraphError> {
        let params = object.map_or_else(Params::new, |object| Params::new().with("object", object));

        let payload = self.graph.delete(&self.path, params, retries).await?;
        info!(object = object.unwrap_or("*"), "unsubscribed");
        Ok(payload)
    }
}
