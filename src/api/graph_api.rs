//! Search and FQL wrappers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::graph::{GraphClient, GraphError, HttpClient, Pages, Params, Payload};

/// Object types the search endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Public posts
    Post,
    /// Users
    User,
    /// Pages
    Page,
    /// Events
    Event,
    /// Groups
    Group,
    /// Places
    Place,
    /// Check-ins
    Checkin,
}

impl SearchType {
    /// Every supported type, in the order the API documents them.
    pub const ALL: [Self; 7] = [
        Self::Post,
        Self::User,
        Self::Page,
        Self::Event,
        Self::Group,
        Self::Place,
        Self::Checkin,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::User => "user",
            Self::Page => "page",
            Self::Event => "event",
            Self::Group => "group",
            Self::Place => "place",
            Self::Checkin => "checkin",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<_> = Self::ALL.iter().map(|kind| kind.as_str()).collect();
                GraphError::InvalidRequest(format!(
                    "Unsupported type \"{s}\". Supported types are {}",
                    supported.join(", ")
                ))
            })
    }
}

/// Higher-level reads on top of a [`GraphClient`].
#[derive(Debug, Clone)]
pub struct GraphApi<H> {
    graph: GraphClient<H>,
}

impl<H> GraphApi<H> {
    /// Wraps a client.
    #[must_use]
    pub const fn new(graph: GraphClient<H>) -> Self {
        Self { graph }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &GraphClient<H> {
        &self.graph
    }
}

impl<H: HttpClient> GraphApi<H> {
    /// Searches for `term` among objects of type `kind`.
    ///
    /// `options` carries extra filters such as `center` and `distance`.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn search(
        &self,
        term: &str,
        kind: SearchType,
        options: Params,
        retries: u32,
    ) -> Result<Payload, GraphError> {
        self.graph
            .get("search", search_params(term, kind, options), retries)
            .await
    }

    /// Searches page by page.
    #[must_use]
    pub fn search_pages(
        &self,
        term: &str,
        kind: SearchType,
        options: Params,
        retries: u32,
    ) -> Pages<'_, H> {
        self.graph
            .get_pages("search", search_params(term, kind, options), retries)
    }

    /// Runs an FQL query.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn fql(&self, query: &str, retries: u32) -> Result<Payload, GraphError> {
        self.graph
            .get("fql", Params::new().with("q", query), retries)
            .await
    }

    /// Runs an FQL multiquery: a map of query names to queries.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidRequest`] if `queries` does not serialize,
    /// otherwise a [`GraphError`] once `retries` is exhausted.
    pub async fn fql_multi<Q: Serialize + ?Sized>(
        &self,
        queries: &Q,
        retries: u32,
    ) -> Result<Payload, GraphError> {
        let encoded = serde_json::to_string(queries)
            .map_err(|e| GraphError::InvalidRequest(format!("cannot encode multiquery: {e}")))?;
        self.fql(&encoded, retries).await
    }
}

fn search_params(term: &str, kind: SearchType, options: Params) -> Params {
    let mut params = Params::new().with("q", term).with("type", kind.as_str());
    for (key, value) in options.iter() {
        params.insert(key, value.clone());
    }
    params
}
