/// Database configuration and connection management
pub mod database;

/// Menu seed configuration loading from config.toml
pub mod menu;

use crate::errors::Result;
use std::env::{self, VarError};

/// Reads an environment variable, using `default` when it is not set.
///
/// # Errors
/// Returns `Error::EnvVar` if the variable is set but is not valid unicode.
pub fn env_or(name: &str, default: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e.into()),
    }
}
