//! Graph API client: request building, response parsing and retries.

use http::header::{CONTENT_TYPE, HeaderValue};
use http::Method;
use tracing::{debug, warn};
use url::Url;

use super::pages::Pages;
use super::{GraphError, HttpClient, HttpError, HttpRequest, IsRetryable, Params, Payload};

/// Default Graph API endpoint.
pub const DEFAULT_API_URL: &str = "https://graph.facebook.com";

/// Parameter carrying the access token on every request.
pub(crate) const ACCESS_TOKEN_PARAM: &str = "access_token";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A single API request description.
///
/// `retries` is the number of times the request may be re-issued after a
/// transport or remote failure; `0` means a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL (leading `/` optional)
    pub path: String,
    /// Query parameters (GET/DELETE) or form body (POST/PUT)
    pub params: Params,
    /// Remaining retries after the first attempt
    pub retries: u32,
}

impl QueryRequest {
    /// Creates a request with no parameters and no retries.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            retries: 0,
        }
    }

    /// Sets the parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

/// Client for a versioned REST+JSON Graph API.
///
/// Holds the transport, the API base URL and the optional access token; all
/// three are fixed for the lifetime of the client. The client is stateless
/// between calls, so it can be shared across tasks if the transport can.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
#[derive(Debug, Clone)]
pub struct GraphClient<H> {
    http: H,
    base_url: Url,
    access_token: Option<String>,
}

impl<H> GraphClient<H> {
    /// Creates a client for [`DEFAULT_API_URL`] without an access token.
    ///
    /// # Panics
    ///
    /// Never: the default URL is a valid constant.
    #[must_use]
    pub fn new(http: H) -> Self {
        Self {
            http,
            base_url: Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!()),
            access_token: None,
        }
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the access token appended to every request.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the configured access token.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn http(&self) -> &H {
        &self.http
    }

    /// Resolves `path` against the base URL.
    ///
    /// Paths are always treated as absolute below the base URL, so `me`
    /// and `/me` address the same resource.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Transport`] with [`HttpError::InvalidUrl`] if
    /// the joined URL does not parse.
    pub fn url_for(&self, path: &str) -> Result<Url, GraphError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let joined = format!("{base}/{path}");

        Url::parse(&joined).map_err(|e| HttpError::InvalidUrl(format!("{joined}: {e}")).into())
    }

    /// Returns `params` with the access token added, if one is configured.
    pub(crate) fn authorize(&self, mut params: Params) -> Params {
        if let Some(token) = &self.access_token {
            params.insert(ACCESS_TOKEN_PARAM, token.as_str());
        }
        params
    }
}

impl<H: HttpClient> GraphClient<H> {
    /// Issues a request and parses its response, retrying transient failures.
    ///
    /// Transport, remote and OAuth failures re-issue the request until
    /// `retries` is exhausted; the last error is then returned. Invalid
    /// input fails immediately.
    ///
    /// # Errors
    ///
    /// Returns the last [`GraphError`] once the retry budget is spent.
    pub async fn query(&self, request: &QueryRequest) -> Result<Payload, GraphError> {
        let url = self.url_for(&request.path)?;
        let params = self.authorize(request.params.clone());

        self.load_with_retries(&request.method, url, &params, request.retries)
            .await
    }

    /// Starts a lazy, page-by-page read of a collection.
    ///
    /// No request is made until the first [`Pages::next_page`] call; each
    /// page is fetched with the retry budget of `request`.
    #[must_use]
    pub fn paginate(&self, request: QueryRequest) -> Pages<'_, H> {
        let first = self.url_for(&request.path);
        let params = self.authorize(request.params);
        Pages::new(self, request.method, first, params, request.retries)
    }

    /// GETs an object.
    ///
    /// # Errors
    ///
    /// As [`GraphClient::query`], plus [`GraphError::Remote`] if the API
    /// answers with the literal `false`.
    pub async fn get(&self, path: &str, params: Params, retries: u32) -> Result<Payload, GraphError> {
        let request = QueryRequest::new(Method::GET, path)
            .with_params(params)
            .with_retries(retries);
        let payload = self.query(&request).await?;
        reject_false(payload, || format!("Could not get \"{path}\"."))
    }

    /// GETs a collection page by page.
    #[must_use]
    pub fn get_pages(&self, path: &str, params: Params, retries: u32) -> Pages<'_, H> {
        self.paginate(
            QueryRequest::new(Method::GET, path)
                .with_params(params)
                .with_retries(retries),
        )
    }

    /// POSTs parameters (and any file uploads) to a path.
    ///
    /// # Errors
    ///
    /// As [`GraphClient::query`], plus [`GraphError::Remote`] if the API
    /// answers with the literal `false`.
    pub async fn post(&self, path: &str, params: Params, retries: u32) -> Result<Payload, GraphError> {
        let request = QueryRequest::new(Method::POST, path)
            .with_params(params)
            .with_retries(retries);
        let payload = self.query(&request).await?;
        reject_false(payload, || format!("Could not post to \"{path}\"."))
    }

    /// DELETEs an object.
    ///
    /// # Errors
    ///
    /// As [`GraphClient::query`], plus [`GraphError::Remote`] if the API
    /// answers with the literal `false`.
    pub async fn delete(&self, path: &str, params: Params, retries: u32) -> Result<Payload, GraphError> {
        let request = QueryRequest::new(Method::DELETE, path)
            .with_params(params)
            .with_retries(retries);
        let payload = self.query(&request).await?;
        reject_false(payload, || format!("Could not delete \"{path}\"."))
    }

    pub(crate) async fn load_with_retries(
        &self,
        method: &Method,
        url: Url,
        params: &Params,
        retries: u32,
    ) -> Result<Payload, GraphError> {
        let mut remaining = retries;
        loop {
            match self.load(method, url.clone(), params).await {
                Ok(payload) => return Ok(payload),
                Err(e) if e.is_retryable() && remaining > 0 => {
                    remaining -= 1;
                    warn!(
                        %method,
                        path = url.path(),
                        error = %e,
                        retries_left = remaining,
                        "Graph API request failed, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Performs one request/response exchange.
    async fn load(&self, method: &Method, url: Url, params: &Params) -> Result<Payload, GraphError> {
        let request = build_request(method, url, params)?;
        debug!(%method, path = request.url.path(), "Graph API request");

        let response = self.http.request(request).await?;
        let payload = Payload::parse(&response.body)?;

        if !response.is_success() && matches!(payload, Payload::Text(_)) {
            return Err(GraphError::Remote {
                message: format!("Unexpected HTTP status {}", response.status),
                code: Some(i64::from(response.status.as_u16())),
            });
        }

        Ok(payload)
    }
}

fn reject_false(payload: Payload, message: impl FnOnce() -> String) -> Result<Payload, GraphError> {
    if payload.is_false() {
        return Err(GraphError::remote(message()));
    }
    Ok(payload)
}

/// Encodes parameters according to the method: query string for
/// GET/DELETE (and any other method), form or multipart body for POST/PUT.
pub(crate) fn build_request(
    method: &Method,
    mut url: Url,
    params: &Params,
) -> Result<HttpRequest, GraphError> {
    if *method == Method::POST || *method == Method::PUT {
        let request = HttpRequest::new(method.clone(), url);
        if params.has_files() {
            return Ok(request.with_multipart(params.clone()));
        }
        return Ok(request
            .with_header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .with_body(params.to_form_urlencoded().into_bytes()));
    }

    if params.has_files() {
        return Err(GraphError::InvalidRequest(format!(
            "file uploads require POST or PUT, not {method}"
        )));
    }

    let pairs = params.form_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(HttpRequest::new(method.clone(), url))
}
