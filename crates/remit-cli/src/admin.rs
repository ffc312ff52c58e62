//! # Administration Subcommands
//!
//! `init` creates the state file; `pause` and `resume` drive the access
//! guard; `mine` advances the logical clock.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use remit_core::{Address, Tick};
use remit_state::LedgerConfig;

use crate::rejected;
use crate::state::StateFile;

/// Arguments for `remit init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Administrator allowed to pause and resume the ledger.
    #[arg(long)]
    pub admin: Address,
    /// Starting tick.
    #[arg(long, default_value_t = 0)]
    pub tick: u64,
    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `remit pause` and `remit resume`.
#[derive(Args, Debug)]
pub struct GuardArgs {
    /// Calling address (must be the administrator).
    #[arg(long)]
    pub from: Address,
}

/// Arguments for `remit mine`.
#[derive(Args, Debug)]
pub struct MineArgs {
    /// Number of ticks to advance.
    #[arg(long, default_value_t = 1)]
    pub blocks: u64,
}

/// Execute `remit init`.
pub fn run_init(args: &InitArgs, state_path: &Path, config_path: Option<&Path>) -> Result<u8> {
    if state_path.exists() && !args.force {
        bail!(
            "state file already exists: {} (use --force to overwrite)",
            state_path.display()
        );
    }

    let config = match config_path {
        Some(path) => LedgerConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => LedgerConfig::default(),
    };
    tracing::info!(
        max_offset = config.max_offset,
        allow_key_reuse = config.allow_key_reuse,
        "ledger configuration"
    );

    let mut state = StateFile::new(args.admin, config)?;
    state.tick = Tick(args.tick);
    state.save(state_path)?;

    println!(
        "OK: initialized {} (admin {}, tick {})",
        state_path.display(),
        args.admin,
        state.tick
    );
    Ok(0)
}

/// Execute `remit pause`.
pub fn run_pause(args: &GuardArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;
    state
        .ledger
        .pause(&state.tick, &args.from)
        .map_err(|e| rejected("pause", e))?;
    state.save(state_path)?;
    println!("OK: ledger paused");
    Ok(0)
}

/// Execute `remit resume`.
pub fn run_resume(args: &GuardArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;
    state
        .ledger
        .resume(&state.tick, &args.from)
        .map_err(|e| rejected("resume", e))?;
    state.save(state_path)?;
    println!("OK: ledger resumed");
    Ok(0)
}

/// Execute `remit mine`.
pub fn run_mine(args: &MineArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;
    let from = state.tick;
    state.tick = from
        .checked_add(args.blocks)
        .with_context(|| format!("tick {from} + {} overflows", args.blocks))?;
    state.save(state_path)?;
    println!("OK: tick {from} -> {}", state.tick);
    Ok(0)
}
