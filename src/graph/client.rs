//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::warn;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, ParamValue, Params, RequestBody};

/// `User-Agent` sent with every Graph API request.
pub const USER_AGENT: &str = concat!("graphlink/", env!("CARGO_PKG_VERSION"));

/// Whole-request timeout applied by [`ReqwestClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Graph API transport backed by reqwest.
///
/// Pre-encoded bodies are sent as-is; [`RequestBody::Multipart`] bodies are
/// turned into a [`reqwest::multipart::Form`], so part headers and the
/// boundary are reqwest's. Cloning shares the connection pool.
///
/// # Example
///
/// ```no_run
/// use graphlink::graph::{GraphClient, ReqwestClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = GraphClient::new(ReqwestClient::new()).with_access_token("token");
/// let me = graph.get("me", Default::default(), 3).await?;
/// println!("{me:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the graphlink user agent and [`DEFAULT_TIMEOUT`].
    ///
    /// Falls back to reqwest's defaults if the TLS backend cannot be
    /// initialized with that configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_builder(reqwest::Client::builder(), DEFAULT_TIMEOUT).unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client configuration");
            Self::from_client(reqwest::Client::new())
        })
    }

    /// Finishes `builder` with the graphlink user agent and `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Connection`] if reqwest cannot build the client.
    pub fn from_builder(
        builder: reqwest::ClientBuilder,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        builder
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map(Self::from_client)
            .map_err(|e| HttpError::Connection(Box::new(e)))
    }

    /// Wraps an already configured reqwest client unchanged.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        builder = match req.body {
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            Some(RequestBody::Multipart(params)) => builder.multipart(multipart_form(params)?),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// Converts parameters into a multipart form, one part per entry in order.
///
/// Filenames with control characters and unparseable content types are
/// rejected, since both end up inside part headers.
fn multipart_form(params: Params) -> Result<Form, HttpError> {
    let mut form = Form::new();

    for (name, value) in params {
        form = match value {
            ParamValue::File(upload) => {
                let (filename, content_type, bytes) = upload.into_parts();
                if filename.chars().any(char::is_control) {
                    return Err(HttpError::InvalidBody(format!(
                        "filename of `{name}` contains control characters"
                    )));
                }
                let part = Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str(&content_type)
                    .map_err(|e| {
                        HttpError::InvalidBody(format!("content type of `{name}`: {e}"))
                    })?;
                form.part(name, part)
            }
            other => {
                let text = other.as_form_value().unwrap_or_default();
                form.text(name, text)
            }
        };
    }

    Ok(form)
}
