//! Subcommand implementations.

pub mod comment;
pub mod config;

use inkcritic_core::{Config, ConfigError};
use std::path::Path;

/// Load config from an explicit path, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
