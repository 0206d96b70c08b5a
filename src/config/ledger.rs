//! Ledger settings loaded from `config.toml`.
//!
//! Everything here is optional; a missing file yields the defaults. Individuals
//! themselves are a fixed enumeration and cannot be configured.

use crate::{
    core::Individual,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Ledger shown at startup
    pub default_individual: Individual,
    /// Symbol placed in front of displayed amounts
    pub currency_symbol: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_individual: Individual::Holden,
            currency_symbol: "$".to_string(),
        }
    }
}

/// Parses ledger configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<LedgerConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads ledger configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid or a value is unknown (e.g. an unknown individual)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("No config file at {:?}; using defaults", path);
        return Ok(LedgerConfig::default());
    }

    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads ledger configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<LedgerConfig> {
    load_config(DEFAULT_CONFIG_PATH)
}
