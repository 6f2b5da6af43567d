//! Environment configuration for the sync client.

use std::env;
use std::fmt;

/// Service root used when `KANSYNC_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://api.dev.kancolle.io/v1/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub api_base: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "environment variable {name} is required"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SyncConfig {
    /// Reads `KANSYNC_API_BASE` (defaulted), `KANSYNC_USERNAME` and
    /// `KANSYNC_PASSWORD` (required).
    pub fn from_env() -> Result<SyncConfig, ConfigError> {
        let api_base =
            env::var("KANSYNC_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let username =
            env::var("KANSYNC_USERNAME").map_err(|_| ConfigError::MissingVar("KANSYNC_USERNAME"))?;
        let password =
            env::var("KANSYNC_PASSWORD").map_err(|_| ConfigError::MissingVar("KANSYNC_PASSWORD"))?;
        Ok(SyncConfig {
            api_base,
            username,
            password,
        })
    }
}
