//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::graph::DEFAULT_API_URL;
use crate::signing::MaxAge;

/// Default Graph API base URL.
pub const API_URL: &str = DEFAULT_API_URL;

/// Default number of retries for a failed API request.
pub const RETRY: u32 = 3;

/// Default listen port of the webhook server.
pub const PORT: u16 = 8080;

/// Default URL path of the webhook callback endpoint.
pub const PATH: &str = "/realtime";

/// Default verify-token age window in seconds.
pub const MAX_AGE_SECS: u64 = 30;

/// Default listen address of the webhook server.
#[must_use]
pub const fn bind() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, PORT))
}

/// Default verify-token age window.
#[must_use]
pub const fn max_age() -> MaxAge {
    MaxAge::Seconds(MAX_AGE_SECS)
}
