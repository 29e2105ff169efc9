//! API wrappers built on the [`crate::graph`] query engine.
//!
//! This module provides:
//! - The shared credentials bundle ([`Credentials`])
//! - Webhook subscription management ([`Subscriptions`])
//! - Search and FQL ([`GraphApi`])
//! - Access token exchange ([`OAuth`])
//! - Test user management ([`TestUsers`])

mod credentials;
mod graph_api;
mod oauth;
mod subscriptions;
mod test_users;


pub use credentials::Credentials;
pub use graph_api::{GraphApi, SearchType};
pub use oauth::{ExtendedToken, OAuth};
pub use subscriptions::{DEFAULT_RETRIES, Subscriptions};
pub use test_users::{NewTestUser, TestUsers};
