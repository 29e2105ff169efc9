//! Batch requests: several API calls in one round trip.

use http::Method;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{GraphClient, GraphError, HttpClient, Params, Payload};
use crate::ErrorKind;

/// One subrequest of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// HTTP method of the subrequest
    pub method: Method,
    /// Path relative to the API root, including any query string
    pub relative_url: String,
    /// Optional form body
    pub body: Option<Params>,
}

impl BatchRequest {
    /// Creates a subrequest without a body.
    #[must_use]
    pub fn new(method: Method, relative_url: impl Into<String>) -> Self {
        Self {
            method,
            relative_url: relative_url.into(),
            body: None,
        }
    }

    /// Creates a GET subrequest.
    #[must_use]
    pub fn get(relative_url: impl Into<String>) -> Self {
        Self::new(Method::GET, relative_url)
    }

    /// Sets the form body.
    #[must_use]
    pub fn with_body(mut self, body: Params) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    method: &'a str,
    relative_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl<'a> From<&'a BatchRequest> for WireRequest<'a> {
    fn from(request: &'a BatchRequest) -> Self {
        Self {
            method: request.method.as_str(),
            relative_url: &request.relative_url,
            body: request.body.as_ref().map(Params::to_form_urlencoded),
        }
    }
}

/// A failed subrequest, together with the request that produced it.
#[derive(Debug, Error)]
#[error("batch request {} {} failed: {error}", .request.method, .request.relative_url)]
pub struct BatchError {
    /// The originating subrequest
    pub request: BatchRequest,
    /// The error the subresponse carried
    #[source]
    pub error: GraphError,
}

impl BatchError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl<H: HttpClient> GraphClient<H> {
    /// Sends `requests` as a single batch call.
    ///
    /// Yields one entry per subrequest, in input order: `None` for an empty
    /// subresponse, otherwise the parsed body or the error it carried.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if the batch call itself fails or its
    /// response is not a list.
    pub async fn batch(
        &self,
        requests: Vec<BatchRequest>,
    ) -> Result<Vec<Option<Result<Payload, BatchError>>>, GraphError> {
        let wire: Vec<WireRequest<'_>> = requests.iter().map(WireRequest::from).collect();
        let encoded = serde_json::to_string(&wire)
            .map_err(|e| GraphError::InvalidRequest(format!("cannot encode batch: {e}")))?;

        let response = self.post("", Params::new().with("batch", encoded), 0).await?;
        let Some(Value::Array(items)) = response.into_json() else {
            return Err(GraphError::remote("Unexpected batch response."));
        };

        Ok(items
            .into_iter()
            .zip(requests)
            .map(|(item, request)| {
                if Payload::is_empty_value(&item) {
                    return None;
                }
                Some(parse_item(&item).map_err(|error| BatchError { request, error }))
            })
            .collect())
    }
}

fn parse_item(item: &Value) -> Result<Payload, GraphError> {
    match item.get("body") {
        Some(Value::String(body)) => Payload::parse(body.as_bytes()),
        Some(other) => Payload::parse(other.to_string().as_bytes()),
        None => Ok(Payload::Json(Value::Null)),
    }
}
