//! graphlink: Graph API client and webhook toolkit
//!
//! A library for talking to a social-graph REST API and receiving its
//! realtime-update webhooks:
//!
//! - [`graph`]: authenticated queries with pagination, retries and batching
//! - [`api`]: subscriptions, search and FQL, OAuth token exchange, test users
//! - [`realtime`]: stateless webhook verification and notification handlers
//! - [`signing`]: signed-request and verify-token codecs
//!
//! Every error type reports an [`ErrorKind`] through its `kind()` accessor.

pub mod api;
pub mod config;
mod error;
pub mod graph;
pub mod realtime;
pub mod signing;
pub mod time;

pub use error::ErrorKind;
