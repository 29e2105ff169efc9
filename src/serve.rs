//! Webhook receiver HTTP server.
//!
//! Serves the callback endpoint: `GET` answers subscription verification,
//! `POST` checks change notification signatures.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use axum::routing::get;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use graphlink::config::{ServerConfig, ValidatedConfig};
use graphlink::realtime::{Callbacks, HandlerOutcome, Notification, Verification, WebhookHandler};
use graphlink::signing::AppSecret;

#[cfg(test)]
#[path = "serve_tests.rs"]
mod tests;

/// Header carrying the notification signature.
const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Error type for the webhook receiver.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Failed to bind the listen address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// The listen address
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Webhook server failed: {0}")]
    Server(#[source] std::io::Error),
}

/// Handler plus the logging callbacks run after each request.
struct Receiver {
    handler: WebhookHandler,
    verification: Callbacks<Verification>,
    notification: Callbacks<Notification>,
}

/// Builds the router serving the callback endpoint at `server.path`.
pub fn router(secret: AppSecret, server: &ServerConfig) -> Router {
    let receiver = Receiver {
        handler: WebhookHandler::new(secret).with_max_age(server.max_age),
        verification: Callbacks::new()
            .on_success(|_: &Verification| info!("subscription verified"))
            .on_error(|_, e| {
                warn!("verification rejected: {e}");
                Ok(())
            }),
        notification: Callbacks::new()
            .on_success(|request: &Notification| {
                info!(bytes = request.payload.len(), "notification accepted");
            })
            .on_error(|_, e| {
                warn!("notification rejected: {e}");
                Ok(())
            }),
    };

    Router::new()
        .route(&server.path, get(verify).post(notify))
        .with_state(Arc::new(receiver))
}

/// Serves the webhook receiver until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServeError::Bind`] if the address is unavailable, or
/// [`ServeError::Server`] if serving fails.
pub async fn serve(config: ValidatedConfig) -> Result<(), ServeError> {
    let bind = config.server.bind;
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|source| ServeError::Bind { addr: bind, source })?;
    let addr = listener.local_addr().unwrap_or(bind);

    info!(
        "Webhook receiver listening on http://{addr}{} (token max age: {})",
        config.server.path, config.server.max_age
    );

    axum::serve(listener, router(config.app_secret, &config.server))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Server)?;

    info!("Webhook receiver stopped");
    Ok(())
}

async fn verify(
    State(receiver): State<Arc<Receiver>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let param = |name: &str| params.get(name).cloned().unwrap_or_default();
    let request = Verification::new(
        param("hub.mode"),
        param("hub.challenge"),
        param("hub.verify_token"),
    );

    let outcome = receiver
        .handler
        .verification_with(&request, &receiver.verification);
    info!(status = outcome.status.as_u16(), mode = %request.mode, "GET");
    respond(outcome)
}

async fn notify(
    State(receiver): State<Arc<Receiver>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let request = Notification::new(body.to_vec(), signature);

    let outcome = receiver
        .handler
        .notification_with(&request, &receiver.notification);
    info!(status = outcome.status.as_u16(), "POST");
    respond(outcome)
}

fn respond<S, E>(outcome: HandlerOutcome<S, E>) -> Response {
    let (status, body, content_type, _, _) = outcome.into_parts();

    let mut response = Response::new(body.map_or_else(Body::empty, Body::from));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received, stopping...");
}
