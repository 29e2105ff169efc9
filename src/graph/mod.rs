//! Graph API query engine.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Request parameters and uploads ([`Params`], [`Upload`])
//! - Querying with retries ([`GraphClient`], [`QueryRequest`])
//! - Pagination ([`Pages`]) and batch calls ([`BatchRequest`])

mod batch;
mod client;
mod error;
mod http;
mod pages;
mod params;
mod payload;
mod query;

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod batch_tests;
#[cfg(test)]
mod http_tests;
#[cfg(test)]
mod payload_tests;

pub use batch::{BatchError, BatchRequest};
pub use client::{DEFAULT_TIMEOUT, ReqwestClient, USER_AGENT};
pub use error::{GraphError, HttpError, IsRetryable};
pub use http::{HttpClient, HttpRequest, HttpResponse, RequestBody};
pub use pages::Pages;
pub use params::{ParamValue, Params, Upload};
pub use payload::Payload;
pub use query::{DEFAULT_API_URL, GraphClient, QueryRequest};
