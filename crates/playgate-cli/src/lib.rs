//! playgate CLI library: command implementations and local configuration.
#![warn(clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

/// CLI subcommand implementations.
pub mod commands;
/// CLI configuration: read/write `~/.playgate/config.toml`.
pub mod config;
