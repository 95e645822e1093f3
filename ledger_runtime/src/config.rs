//! Runtime configuration.
//!
//! ```toml
//! issuer = "treasury-admin"
//!
//! [constants]
//! price = 1
//! combined_name = "Combined Asset"
//! combined_description = "Formed by combining two asset records"
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use ledger_kernel::{LedgerConstants, Principal};

use crate::error::ConfigError;

pub const DEFAULT_ISSUER: &str = "issuer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RuntimeConfig {
    /// Principal that receives the issuer capability at bring-up.
    pub issuer: Principal,
    pub constants: LedgerConstants,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            issuer: Principal::new(DEFAULT_ISSUER),
            constants: LedgerConstants::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), issuer = %config.issuer, price = config.constants.price, "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.constants.price == 0 {
            return Err(ConfigError::Invalid("price must be at least 1".to_string()));
        }
        if self.issuer.as_str().is_empty() {
            return Err(ConfigError::Invalid("issuer must not be empty".to_string()));
        }
        Ok(())
    }
}
