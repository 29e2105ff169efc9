//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Application credentials
    #[serde(default)]
    pub app: AppSection,

    /// Graph API client configuration
    #[serde(default)]
    pub api: ApiSection,

    /// Webhook server configuration
    #[serde(default)]
    pub server: ServerSection,
}

/// Application credentials section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Application id
    pub id: Option<String>,

    /// Application secret
    pub secret: Option<String>,
}

/// Graph API client section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Base URL
    pub url: Option<String>,

    /// Access token sent with every request
    pub access_token: Option<String>,

    /// Retries for a failed request
    pub retry: Option<u32>,
}

/// Webhook server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Listen address, `host:port`
    pub bind: Option<String>,

    /// URL path of the callback endpoint
    pub path: Option<String>,

    /// Verify-token age window
    pub max_age: Option<MaxAgeSetting>,
}

/// A token age window as written in the file: `30` or `"unbounded"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MaxAgeSetting {
    /// Window in seconds
    Seconds(u64),
    /// Textual form, validated later
    Text(String),
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# graphlink configuration file

[app]
# Application id (required for subscription commands)
# id = "123456789"

# Application secret (required)
# Signs verify tokens and signed requests, and checks payload signatures.
# secret = "your-app-secret"

[api]
# Graph API base URL (default: https://graph.facebook.com)
# url = "https://graph.facebook.com"

# Access token sent with every request.
# If unset, subscription commands request an application access token.
# access_token = "..."

# Number of retries for a failed request (default: 3)
retry = 3

[server]
# Listen address of the webhook server (default: 127.0.0.1:8080)
# bind = "127.0.0.1:8080"

# URL path of the callback endpoint (default: /realtime)
# path = "/realtime"

# Accepted verify-token age in seconds, or "unbounded" (default: 30)
max_age = 30
"#
    .to_string()
}
