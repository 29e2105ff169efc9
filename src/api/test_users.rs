//! Test user accounts of an application.

use crate::graph::{GraphClient, GraphError, HttpClient, Params, Payload};

/// Options for creating a test user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestUser {
    /// Whether the user has installed the application
    pub installed: bool,
    /// Permissions granted to the application
    pub permissions: Vec<String>,
    /// Display name; the API picks one if unset
    pub name: Option<String>,
    /// Locale of the account
    pub locale: String,
}

impl Default for NewTestUser {
    fn default() -> Self {
        Self {
            installed: true,
            permissions: Vec::new(),
            name: None,
            locale: "en_US".to_string(),
        }
    }
}

/// Manages the `{app_id}/accounts/test-users` collection.
#[derive(Debug, Clone)]
pub struct TestUsers<H> {
    graph: GraphClient<H>,
    path: String,
}

impl<H> TestUsers<H> {
    /// Creates a manager for the given application.
    #[must_use]
    pub fn new(graph: GraphClient<H>, app_id: &str) -> Self {
        Self {
            graph,
            path: format!("{app_id}/accounts/test-users"),
        }
    }
}

impl<H: HttpClient> TestUsers<H> {
    /// Lists the application's test users.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn list(&self, retries: u32) -> Result<Payload, GraphError> {
        self.graph.get(&self.path, Params::new(), retries).await
    }

    /// Creates a new test user.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn create(&self, user: &NewTestUser, retries: u32) -> Result<Payload, GraphError> {
        let mut params = Params::new()
            .with("installed", user.installed)
            .with("locale", user.locale.as_str());
        if !user.permissions.is_empty() {
            params.insert("permissions", user.permissions.clone());
        }
        if let Some(name) = &user.name {
            params.insert("name", name);
        }

        self.graph.post(&self.path, params, retries).await
    }

    /// Associates an existing user with the application as a test user.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] once `retries` is exhausted.
    pub async fn add(
        &self,
        uid: &str,
        owner_access_token: &str,
        installed: bool,
        permissions: &[&str],
        retries: u32,
    ) -> Result<Payload, GraphError> {
        let mut params = Params::new()
            .with("uid", uid)
            .with("owner_access_token", owner_access_token)
            .with("installed", installed);
        if !permissions.is_empty() {
            params.insert("permissions", permissions);
        }

        self.graph.post(&self.path, params, retries).await
    }
}
