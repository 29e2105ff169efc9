//! Configuration layer for graphlink.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`SubscriptionsCommand`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The application secret has no default and is required by every command
//! except `init`. The application id is only required by `subscriptions`.
//!
//! Server settings (`bind`, `path`, `max_age`) are flags of the `serve`
//! subcommand and fall back to the `[server]` section.
//!
//! The secret never appears in the [`ValidatedConfig`] `Display` or `Debug` output.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command, SubscriptionsCommand};
pub use error::{ConfigError, field};
pub use toml::{MaxAgeSetting, TomlConfig, default_config_template};
pub use validated::{ServerConfig, ValidatedConfig, write_default_config};
