//! TOML configuration loader with validation.
//!
//! Loads a [`ProtectionFile`] (`[shared]` + `[protection]`) and validates it
//! by building a [`ProtectionEngine`] from it: every curve, threshold order,
//! rate and seed check of the engine applies to the file.

use std::path::Path;

use bp_common::config::{ConfigError, ConfigLoader, SharedConfig};
use bp_common::protection::config::ProtectionConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ProtectionEngine;

/// Complete configuration file of one monitored battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionFile {
    pub shared: SharedConfig,
    #[serde(default)]
    pub protection: ProtectionConfig,
}

impl ProtectionFile {
    /// Validate and build a fresh engine.
    pub fn build_engine(&self) -> Result<ProtectionEngine, ConfigError> {
        self.shared.validate()?;
        ProtectionEngine::new(&self.protection)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<ProtectionFile, ConfigError> {
    let file = ProtectionFile::load(path)?;
    file.build_engine()?;
    debug!(path = %path.display(), battery = %file.shared.battery_id, "configuration loaded");
    Ok(file)
}

/// Load and validate configuration from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<ProtectionFile, ConfigError> {
    let file = ProtectionFile::load_str(content)?;
    file.build_engine()?;
    Ok(file)
}
