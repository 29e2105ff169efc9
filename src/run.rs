//! Application execution logic.
//!
//! This module dispatches the parsed subcommand: subscription management
//! against the Graph API, the webhook receiver, and the signed-request codec.

use std::io::Read;

use serde_json::Value;
use thiserror::Error;

use graphlink::api::{Credentials, OAuth, Subscriptions};
use graphlink::config::{Command, SubscriptionsCommand, ValidatedConfig};
use graphlink::graph::{GraphError, HttpClient, Payload, ReqwestClient};
use graphlink::signing::{CodecError, HMAC_SHA256, SignedRequest};

use crate::serve::{self, ServeError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A Graph API request failed.
    #[error("Graph API request failed: {0}")]
    Graph(#[from] GraphError),

    /// Signing or decoding a signed request failed.
    #[error("Signed request error: {0}")]
    Codec(#[from] CodecError),

    /// Failed to read the document to sign.
    #[error("Failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    /// The document to sign is not valid JSON.
    #[error("Invalid JSON document: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A subscription command ran without an application id.
    #[error("Missing application id")]
    MissingAppId,

    /// The webhook receiver failed.
    #[error(transparent)]
    Serve(#[from] ServeError),
}

/// Executes the selected subcommand.
///
/// Command output goes to stdout; logs go to stderr.
///
/// # Errors
///
/// Returns a [`RunError`] describing the first failure.
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    let output = match command {
        // Handled before configuration is loaded.
        Command::Init { .. } => return Ok(()),
        Command::Serve { .. } => return Ok(serve::serve(config).await?),
        Command::Subscriptions(command) => {
            subscriptions(&config, ReqwestClient::new(), command).await?
        }
        Command::SignRequest => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(RunError::Stdin)?;
            sign_request(&config, &input)?
        }
        Command::DecodeRequest { signed_request } => decode_request(&config, &signed_request)?,
    };

    println!("{output}");
    Ok(())
}

/// Runs a subscription command and renders the API response.
///
/// Without a configured access token, an application access token is
/// requested first.
async fn subscriptions<H: HttpClient>(
    config: &ValidatedConfig,
    http: H,
    command: SubscriptionsCommand,
) -> Result<String, RunError> {
    let app_id = config.app_id.as_deref().ok_or(RunError::MissingAppId)?;

    let access_token = match &config.access_token {
        Some(token) => token.clone(),
        None => {
            tracing::debug!("No access token configured, requesting an application token");
            OAuth::new(&http)
                .with_base_url(config.api_url.clone())
                .application_access_token(app_id, &config.app_secret)
                .await?
        }
    };

    let credentials =
        Credentials::new(app_id, config.app_secret.clone()).with_access_token(access_token);
    let subscriptions =
        Subscriptions::for_app(credentials.client(http, config.api_url.clone()), &credentials);

    let payload = match command {
        SubscriptionsCommand::List => subscriptions.list(config.retry).await?,
        SubscriptionsCommand::Add {
            object,
            fields,
            callback_url,
            verify_token,
        } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            subscriptions
                .subscribe(
                    &object,
                    &fields,
                    &callback_url,
                    verify_token.as_deref().map(str::as_bytes),
                    config.retry,
                )
                .await?
        }
        SubscriptionsCommand::Remove { object } => {
            subscriptions
                .unsubscribe(object.as_deref(), config.retry)
                .await?
        }
    };

    Ok(render(&payload))
}

/// Signs a JSON document.
///
/// Objects without an `algorithm` field get `HMAC-SHA256`, so the result
/// decodes with the same secret.
fn sign_request(config: &ValidatedConfig, input: &str) -> Result<String, RunError> {
    let mut document: Value = serde_json::from_str(input).map_err(RunError::InvalidJson)?;
    if let Value::Object(fields) = &mut document {
        fields
            .entry("algorithm")
            .or_insert_with(|| Value::from(HMAC_SHA256));
    }

    Ok(SignedRequest::new(config.app_secret.clone()).encode(&document)?)
}

/// Verifies and decodes a signed request.
fn decode_request(config: &ValidatedConfig, signed_request: &str) -> Result<String, RunError> {
    let payload = SignedRequest::new(config.app_secret.clone()).decode(signed_request.trim())?;
    Ok(format!("{payload:#}"))
}

fn render(payload: &Payload) -> String {
    match payload {
        Payload::Json(value) => format!("{value:#}"),
        Payload::Text(text) => text.clone(),
    }
}
