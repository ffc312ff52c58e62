//! # Persisted CLI State
//!
//! The `remit` binary keeps everything in one JSON file: the ledger, the
//! account book that funds `create` and receives payouts, and the current
//! tick. Each invocation loads the file, performs one call and writes the
//! file back only if the call succeeded.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use remit_core::{Address, Tick};
use remit_state::{AccountBook, EscrowLedger, LedgerConfig};

/// Default state file name, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "remit-state.json";

/// Contents of the state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    /// Current logical tick. Advanced only by `remit mine`.
    pub tick: Tick,
    /// The escrow ledger.
    pub ledger: EscrowLedger,
    /// Balances outside the ledger's custody.
    pub accounts: AccountBook,
}

impl StateFile {
    /// A fresh state at tick zero with an empty ledger.
    pub fn new(admin: Address, config: LedgerConfig) -> Result<Self> {
        let ledger = EscrowLedger::new(admin, config).context("invalid ledger configuration")?;
        Ok(Self {
            tick: Tick::GENESIS,
            ledger,
            accounts: AccountBook::new(),
        })
    }

    /// Load and check a state file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "state file not found: {} (run `remit init` first)",
                path.display()
            );
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state file: {}", path.display()))?;
        let state: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse state file: {}", path.display()))?;
        state
            .ledger
            .verify_custody()
            .with_context(|| format!("state file is inconsistent: {}", path.display()))?;
        tracing::debug!(path = %path.display(), tick = %state.tick, "loaded state");
        Ok(state)
    }

    /// Write the state file, replacing any previous contents.
    ///
    /// Writes to a sibling temporary file first and renames it into place,
    /// so an interrupted write never leaves a truncated state file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace state file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), tick = %self.tick, "saved state");
        Ok(())
    }
}
