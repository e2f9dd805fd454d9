use crate::error::MersenneError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sieve bound used when neither the command line nor a config file sets one.
pub const DEFAULT_LIMIT: i64 = 1000;

/// Application configuration, optionally loaded from a TOML file.
///
/// ```toml
/// limit = 1000
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    // Upper bound for the sieve; every prime up to and including it is tested.
    #[serde(default = "Config::default_limit")]
    pub limit: i64,
}

impl Config {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }

    /// Builds the configuration from an optional TOML file and an optional
    /// explicit limit, the latter taking precedence.
    pub fn resolve(config_path: Option<&Path>, limit: Option<i64>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        if let Some(limit) = limit {
            config.limit = limit;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects limits the sieve cannot work with.
    pub fn validate(&self) -> Result<(), MersenneError> {
        if self.limit < 0 {
            return Err(MersenneError::InvalidArgument {
                limit: self.limit,
                reason: "limit must not be negative".to_string(),
            });
        }
        Ok(())
    }

    // Loads configuration from a TOML file.
    fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)?;
        toml::from_str::<Config>(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    fn default_limit() -> i64 {
        DEFAULT_LIMIT
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
        }
    }
}
