//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use url::Url;

use crate::signing::{AppSecret, MaxAge};

use super::cli::{Cli, Command};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{MaxAgeSetting, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Application id; required by subscription commands
    pub app_id: Option<String>,

    /// Application secret (required)
    pub app_secret: AppSecret,

    /// Access token sent with every API request
    pub access_token: Option<String>,

    /// Graph API base URL
    pub api_url: Url,

    /// Retries for a failed API request
    pub retry: u32,

    /// Webhook server settings
    pub server: ServerConfig,

    /// Verbose logging enabled
    pub verbose: bool,
}

/// Settings of the webhook server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,

    /// URL path of the callback endpoint
    pub path: String,

    /// Accepted verify-token age window
    pub max_age: MaxAge,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ app_id: {}, api_url: {}, access_token: {}, retry: {}, bind: {}, path: {}, max_age: {} }}",
            self.app_id.as_deref().unwrap_or("none"),
            self.api_url,
            if self.access_token.is_some() { "set" } else { "none" },
            self.retry,
            self.server.bind,
            self.server.path,
            self.server.max_age,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The application secret is missing
    /// - The application id is missing for a subscription command
    /// - The API URL is not an absolute `http`/`https` URL
    /// - A server setting is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let app_secret = Self::resolve_app_secret(cli, toml)?;
        let app_id = Self::resolve_app_id(cli, toml)?;
        let api_url = Self::resolve_api_url(cli, toml)?;

        let access_token = cli
            .access_token
            .clone()
            .or_else(|| toml.and_then(|t| t.api.access_token.clone()))
            .filter(|token| !token.is_empty());

        let retry = cli
            .retry
            .or_else(|| toml.and_then(|t| t.api.retry))
            .unwrap_or(defaults::RETRY);

        let server = Self::resolve_server(cli, toml)?;

        Ok(Self {
            app_id,
            app_secret,
            access_token,
            api_url,
            retry,
            server,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_app_secret(cli: &Cli, toml: Option<&TomlConfig>) -> Result<AppSecret, ConfigError> {
        cli.app_secret
            .as_deref()
            .or_else(|| toml.and_then(|t| t.app.secret.as_deref()))
            .filter(|secret| !secret.is_empty())
            .map(AppSecret::from)
            .ok_or_else(|| {
                ConfigError::missing(
                    field::APP_SECRET,
                    "Use --app-secret or set app.secret in config file",
                )
            })
    }

    fn resolve_app_id(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<String>, ConfigError> {
        let app_id = cli
            .app_id
            .clone()
            .or_else(|| toml.and_then(|t| t.app.id.clone()))
            .filter(|id| !id.is_empty());

        if app_id.is_none() && cli.command.needs_app_id() {
            return Err(ConfigError::missing(
                field::APP_ID,
                "Use --app-id or set app.id in config file",
            ));
        }

        Ok(app_id)
    }

    fn resolve_api_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .api_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.api.url.as_deref()))
            .unwrap_or(defaults::API_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(url)
    }

    fn resolve_server(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ServerConfig, ConfigError> {
        let (cli_bind, cli_path, cli_max_age) = match &cli.command {
            Command::Serve {
                bind,
                path,
                max_age,
            } => (bind.as_deref(), path.as_deref(), max_age.as_deref()),
            _ => (None, None, None),
        };
        let section = toml.map(|t| &t.server);

        let bind = match cli_bind.or_else(|| section.and_then(|s| s.bind.as_deref())) {
            Some(value) => parse_bind(value)?,
            None => defaults::bind(),
        };

        let path = cli_path
            .or_else(|| section.and_then(|s| s.path.as_deref()))
            .unwrap_or(defaults::PATH);
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidPath {
                value: path.to_string(),
            });
        }

        let max_age = match cli_max_age {
            Some(value) => parse_max_age(value)?,
            None => match section.and_then(|s| s.max_age.as_ref()) {
                Some(MaxAgeSetting::Seconds(secs)) => MaxAge::Seconds(*secs),
                Some(MaxAgeSetting::Text(value)) => parse_max_age(value)?,
                None => defaults::max_age(),
            },
        };

        Ok(ServerConfig {
            bind,
            path: path.to_string(),
            max_age,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidBind {
        value: value.to_string(),
    })
}

fn parse_max_age(value: &str) -> Result<MaxAge, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("unbounded") {
        return Ok(MaxAge::Unbounded);
    }

    trimmed
        .strip_suffix('s')
        .unwrap_or(trimmed)
        .parse()
        .map(MaxAge::Seconds)
        .map_err(|_| ConfigError::InvalidMaxAge {
            value: value.to_string(),
        })
}
