//! Scripted [`HttpClient`] shared by the Graph and API tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, RequestBody};

/// Mock HTTP client that replays a sequence of responses and records requests.
#[derive(Debug, Default)]
pub(crate) struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub(crate) fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Answers every call in order with `200 OK` and the given JSON bodies.
    pub(crate) fn json(bodies: &[&str]) -> Self {
        Self::new(
            bodies
                .iter()
                .map(|body| Ok(HttpResponse::ok(body.as_bytes())))
                .collect(),
        )
    }

    pub(crate) fn always_failing(times: usize) -> Self {
        Self::new((0..times).map(|_| Err(HttpError::Timeout)).collect())
    }

    pub(crate) fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub(crate) fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.captured_requests()
            .pop()
            .expect("no request was captured")
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::Connection("no scripted response left".into())))
    }
}

/// Returns the query parameters of a captured request.
pub(crate) fn query_of(request: &HttpRequest) -> Vec<(String, String)> {
    request.url.query_pairs().into_owned().collect()
}

/// Returns the form-encoded body parameters of a captured request.
pub(crate) fn form_of(request: &HttpRequest) -> Vec<(String, String)> {
    let body = request.body.as_ref().and_then(RequestBody::as_bytes);
    url::form_urlencoded::parse(body.unwrap_or_default())
        .into_owned()
        .collect()
}

/// Returns the value of `key` in a list of pairs.
pub(crate) fn value_of<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
