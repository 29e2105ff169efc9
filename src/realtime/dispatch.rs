//! Success/error callback dispatch around webhook handlers.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use http::StatusCode;
use tracing::error;

use super::{CallbackError, HandlerError};

type SuccessFn<A, S> = dyn Fn(&A) -> S + Send + Sync;
type ErrorFn<A, E> = dyn Fn(&A, &HandlerError) -> Result<E, CallbackError> + Send + Sync;

/// The response a handler computed before callbacks run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body
    pub body: Option<String>,
    /// `Content-Type` of the body
    pub content_type: Option<&'static str>,
}

impl Reply {
    /// A reply with a status and no body.
    #[must_use]
    pub const fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: None,
            content_type: None,
        }
    }

    /// A `200 OK` plain-text reply.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body.into()),
            content_type: Some("text/plain"),
        }
    }
}

/// The uniform result of every webhook handler call.
///
/// Whatever path the handler took, the outcome carries the same five parts:
/// status, body, content type, and the results of the success and error
/// callbacks (each `None` when that callback did not run or was not set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome<S = (), E = ()> {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body
    pub body: Option<String>,
    /// `Content-Type` of the body
    pub content_type: Option<&'static str>,
    /// Result of the success callback
    pub success: Option<S>,
    /// Result of the error callback
    pub error: Option<E>,
}

impl<S, E> HandlerOutcome<S, E> {
    /// Splits the outcome into its five parts.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        StatusCode,
        Option<String>,
        Option<&'static str>,
        Option<S>,
        Option<E>,
    ) {
        (
            self.status,
            self.body,
            self.content_type,
            self.success,
            self.error,
        )
    }
}

/// Optional callbacks run after a handler.
///
/// `A` is the handler's request type, `S` and `E` the values the success
/// and error callbacks produce.
pub struct Callbacks<A, S = (), E = ()> {
    on_success: Option<Box<SuccessFn<A, S>>>,
    on_error: Option<Box<ErrorFn<A, E>>>,
}

impl<A, S, E> Callbacks<A, S, E> {
    /// No callbacks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }

    /// Runs `f` with the request after the handler accepted it.
    #[must_use]
    pub fn on_success(mut self, f: impl Fn(&A) -> S + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Runs `f` with the request and the error after the handler rejected it.
    ///
    /// If `f` itself fails or panics, the failure is logged and the error
    /// result is `None`.
    #[must_use]
    pub fn on_error(
        mut self,
        f: impl Fn(&A, &HandlerError) -> Result<E, CallbackError> + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl<A, S, E> Default for Callbacks<A, S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S, E> fmt::Debug for Callbacks<A, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Runs `handler` on `request` and applies `callbacks` to the result.
///
/// A handler error never escapes: the reply becomes `403` with no body, and
/// the error callback receives the request and the error. A panic in the
/// error callback is caught and treated like a failed callback.
pub fn dispatch<A, S, E>(
    request: &A,
    callbacks: &Callbacks<A, S, E>,
    handler: impl FnOnce(&A) -> Result<Reply, HandlerError>,
) -> HandlerOutcome<S, E> {
    match handler(request) {
        Ok(reply) => HandlerOutcome {
            status: reply.status,
            body: reply.body,
            content_type: reply.content_type,
            success: callbacks.on_success.as_ref().map(|f| f(request)),
            error: None,
        },
        Err(e) => {
            let error = callbacks
                .on_error
                .as_ref()
                .and_then(|f| match panic::catch_unwind(AssertUnwindSafe(|| f(request, &e))) {
                    Ok(Ok(value)) => Some(value),
                    Ok(Err(callback_error)) => {
                        error!(error = %callback_error, handler_error = %e, "error callback failed");
                        None
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!(panic = message, handler_error = %e, "error callback panicked");
                        None
                    }
                });

            HandlerOutcome {
                status: StatusCode::FORBIDDEN,
                body: None,
                content_type: None,
                success: None,
                error,
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
