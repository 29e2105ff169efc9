//! Lazy pagination over `paging.next` cursors.

use futures::Stream;
use http::Method;
use tracing::debug;
use url::Url;

use super::{GraphClient, GraphError, HttpClient, HttpError, Params, Payload};

/// Parameters the next-page URL already encodes.
const CURSOR_PARAMS: [&str; 3] = ["offset", "until", "since"];

/// A pull-based cursor over the pages of a collection.
///
/// Each [`Pages::next_page`] call performs one request (with the retry budget
/// of the originating query) and yields that page's parsed body. The cursor
/// follows `paging.next` until a page has none, or until a page fails; it
/// cannot be rewound, so restarting means issuing a fresh query.
///
/// # Example
///
/// ```no_run
/// use graphlink::graph::{GraphClient, Params, ReqwestClient};
///
/// # async fn example() -> Result<(), graphlink::graph::GraphError> {
/// let graph = GraphClient::new(ReqwestClient::new()).with_access_token("token");
/// let mut pages = graph.get_pages("me/friends", Params::new().with("limit", 100), 3);
///
/// while let Some(page) = pages.next_page().await {
///     println!("{:?}", page?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pages<'a, H> {
    client: &'a GraphClient<H>,
    method: Method,
    next: Option<Result<Url, GraphError>>,
    params: Params,
    retries: u32,
    fetched: usize,
}

impl<'a, H: HttpClient> Pages<'a, H> {
    pub(crate) const fn new(
        client: &'a GraphClient<H>,
        method: Method,
        first: Result<Url, GraphError>,
        params: Params,
        retries: u32,
    ) -> Self {
        Self {
            client,
            method,
            next: Some(first),
            params,
            retries,
            fetched: 0,
        }
    }

    /// Returns true if another page may be fetched.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the number of pages fetched so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Fetches the next page.
    ///
    /// Returns `None` once the collection is exhausted. An error ends the
    /// sequence: the following call returns `None`.
    pub async fn next_page(&mut self) -> Option<Result<Payload, GraphError>> {
        let url = match self.next.take()? {
            Ok(url) => url,
            Err(e) => return Some(Err(e)),
        };

        let params = if self.fetched == 0 {
            self.params.clone()
        } else {
            for key in CURSOR_PARAMS {
                self.params.remove(key);
            }
            without_duplicates(&url, &self.params)
        };

        debug!(page = self.fetched + 1, path = url.path(), "fetching page");
        let result = self
            .client
            .load_with_retries(&self.method, url, &params, self.retries)
            .await;
        self.fetched += 1;

        match result {
            Ok(payload) => {
                self.next = payload.next_page_url().map(|next| {
                    Url::parse(next).map_err(|e| {
                        GraphError::from(HttpError::InvalidUrl(format!("{next}: {e}")))
                    })
                });
                Some(Ok(payload))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Fetches every remaining page.
    ///
    /// # Errors
    ///
    /// Returns the first page error; pages fetched before it are discarded.
    pub async fn collect_all(mut self) -> Result<Vec<Payload>, GraphError> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await {
            pages.push(page?);
        }
        Ok(pages)
    }

    /// Converts the cursor into a [`Stream`] of pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<Payload, GraphError>> + 'a {
        futures::stream::unfold(self, |mut pages| async move {
            let page = pages.next_page().await?;
            Some((page, pages))
        })
    }
}

/// Returns `params` minus those the next-page URL already carries.
fn without_duplicates(url: &Url, params: &Params) -> Params {
    let mut params = params.clone();
    for (key, _) in url.query_pairs() {
        params.remove(&key);
    }
    params
}
