//! Webhook receiver: verification and notification handlers.
//!
//! This module provides:
//! - The stateless handler state machine ([`WebhookHandler`])
//! - The uniform five-part result ([`HandlerOutcome`])
//! - Optional success/error callbacks ([`Callbacks`], [`dispatch`])
//!
//! Handlers are pure functions of their inputs and the clock; they can be
//! called concurrently from any number of tasks.

mod dispatch;
mod error;
mod handler;

#[cfg(test)]
mod handler_tests;

pub use dispatch::{Callbacks, HandlerOutcome, Reply, dispatch};
pub use error::{CallbackError, HandlerError};
pub use handler::{HubAlgorithm, Notification, SUBSCRIBE_MODE, Verification, WebhookHandler};
