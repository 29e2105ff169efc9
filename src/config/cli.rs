//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// graphlink: Graph API client and webhook toolkit
///
/// Manages webhook subscriptions, serves the webhook callback endpoint and
/// signs or decodes signed requests.
#[derive(Debug, Parser)]
#[command(name = "graphlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Application id
    #[arg(long = "app-id", global = true)]
    pub app_id: Option<String>,

    /// Application secret
    #[arg(long = "app-secret", global = true)]
    pub app_secret: Option<String>,

    /// Access token sent with every API request
    #[arg(long = "access-token", global = true)]
    pub access_token: Option<String>,

    /// Graph API base URL
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Number of times a failed API request is retried
    #[arg(long, global = true)]
    pub retry: Option<u32>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for graphlink
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "graphlink.toml")]
        output: PathBuf,
    },

    /// Manage the application's webhook subscriptions
    #[command(subcommand)]
    Subscriptions(SubscriptionsCommand),

    /// Serve the webhook callback endpoint
    Serve {
        /// Socket address to listen on
        #[arg(long)]
        bind: Option<String>,

        /// URL path of the callback endpoint
        #[arg(long)]
        path: Option<String>,

        /// Accepted verify-token age in seconds, or "unbounded"
        #[arg(long = "max-age")]
        max_age: Option<String>,
    },

    /// Sign a JSON document (read from stdin) as a signed request
    SignRequest,

    /// Verify and decode a signed request
    DecodeRequest {
        /// The signed request
        signed_request: String,
    },
}

/// Subscription management subcommands
#[derive(Debug, Subcommand)]
pub enum SubscriptionsCommand {
    /// List subscribed objects and fields
    List,

    /// Subscribe to changes of an object type
    Add {
        /// Object type, e.g. "user" or "page"
        #[arg(long)]
        object: String,

        /// Fields to watch (comma-separated or repeated)
        #[arg(long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// URL the platform delivers notifications to
        #[arg(long = "callback-url")]
        callback_url: String,

        /// Verify token to sign; random if omitted
        #[arg(long = "verify-token")]
        verify_token: Option<String>,
    },

    /// Delete one object's subscription, or all of them
    Remove {
        /// Object type; every subscription is deleted if omitted
        #[arg(long)]
        object: Option<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}

impl Command {
    /// Returns true if the command talks to the subscriptions API.
    #[must_use]
    pub const fn needs_app_id(&self) -> bool {
        matches!(self, Self::Subscriptions(_))
    }
}
