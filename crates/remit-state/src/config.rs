//! # Ledger Configuration
//!
//! Business rules that are fixed when a ledger is created. Loaded from
//! YAML by the CLI; every field has a default so an empty document is a
//! valid configuration.
//!
//! ```yaml
//! max_offset: 40320      # ~one week of blocks
//! allow_key_reuse: false # reject create on a settled key
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use remit_core::RemitError;

/// Default exclusive upper bound on the deadline offset, in ticks.
pub const DEFAULT_MAX_OFFSET: u64 = 40_320;

/// Ledger business rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Offsets must be strictly below this value.
    pub max_offset: u64,
    /// Allow `create` to overwrite a settled record at the same key.
    /// Open records are never overwritten.
    pub allow_key_reuse: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_offset: DEFAULT_MAX_OFFSET,
            allow_key_reuse: false,
        }
    }
}

impl LedgerConfig {
    /// Check that the rules admit at least one valid escrow.
    pub fn validate(&self) -> Result<(), RemitError> {
        if self.max_offset == 0 {
            return Err(RemitError::Config(
                "max_offset must be at least 1 (offsets are exclusive of the bound)".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, RemitError> {
        let config: Self = if s.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(s).map_err(|e| RemitError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, RemitError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
