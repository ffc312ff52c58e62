//! # Escrow Subcommands
//!
//! - `key`: derive a commitment key off-ledger.
//! - `create`: lock funds from the caller's balance under a key.
//! - `claim`: redeem a secret and credit the caller.
//! - `reclaim`: take an expired escrow back to the issuer.
//! - `query`: show one record.
//! - `events`: print the ledger's event log.
//!
//! A rejected call returns an error and the state file is not rewritten.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use remit_core::{Address, Amount, CommitmentKey};
use remit_state::EscrowTerms;

use crate::rejected;
use crate::state::StateFile;

/// Arguments for `remit key`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Secret shared out-of-band with the recipient.
    #[arg(long)]
    pub secret: String,
    /// Address that will claim.
    #[arg(long)]
    pub recipient: Address,
}

/// Arguments for `remit create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Issuer address; funds are taken from its balance.
    #[arg(long)]
    pub from: Address,
    /// Precomputed commitment key.
    #[arg(long, conflicts_with = "secret", required_unless_present = "secret")]
    pub key: Option<CommitmentKey>,
    /// Derive the key from this secret and `--recipient` instead.
    #[arg(long)]
    pub secret: Option<String>,
    /// Ticks until the issuer may reclaim.
    #[arg(long)]
    pub offset: u64,
    /// Address allowed to claim.
    #[arg(long)]
    pub recipient: Address,
    /// Amount to lock, in base units.
    #[arg(long)]
    pub value: Amount,
}

/// Arguments for `remit claim`.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// Claiming address (must be the bound recipient).
    #[arg(long)]
    pub from: Address,
    /// The secret.
    #[arg(long)]
    pub secret: String,
}

/// Arguments for `remit reclaim`.
#[derive(Args, Debug)]
pub struct ReclaimArgs {
    /// Issuer address.
    #[arg(long)]
    pub from: Address,
    /// Commitment key of the expired escrow.
    #[arg(long)]
    pub key: CommitmentKey,
}

/// Arguments for `remit query`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Commitment key to look up.
    #[arg(long)]
    pub key: CommitmentKey,
}

/// Arguments for `remit events`.
#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Print events as JSON, one per line.
    #[arg(long)]
    pub json: bool,
}

/// Print the commitment key for a secret and recipient.
pub fn run_key(args: &KeyArgs) -> Result<u8> {
    let key = CommitmentKey::derive(args.secret.as_bytes(), &args.recipient);
    println!("{key}");
    Ok(0)
}

/// Execute `remit create`.
pub fn run_create(args: &CreateArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;

    let key = match (&args.key, &args.secret) {
        (Some(key), _) => *key,
        (None, Some(secret)) => CommitmentKey::derive(secret.as_bytes(), &args.recipient),
        (None, None) => anyhow::bail!("either --key or --secret is required"),
    };

    // On any error below the state is dropped unsaved, which returns the
    // withdrawn funds to the issuer.
    state
        .accounts
        .withdraw(&args.from, args.value)
        .context("issuer cannot fund the escrow")?;

    let terms = EscrowTerms {
        key,
        offset: args.offset,
        recipient: args.recipient,
        funds: args.value,
    };
    let record = state
        .ledger
        .create(&state.tick, &args.from, terms)
        .map_err(|e| rejected("create", e))?;

    state.save(state_path)?;
    println!(
        "OK: created escrow {key} amount={} deadline={}",
        record.amount, record.deadline
    );
    Ok(0)
}

/// Execute `remit claim`.
pub fn run_claim(args: &ClaimArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;
    let amount = state
        .ledger
        .claim(
            &state.tick,
            &args.from,
            args.secret.as_bytes(),
            &mut state.accounts,
        )
        .map_err(|e| rejected("claim", e))?;

    state.save(state_path)?;
    println!("OK: claimed {amount} to {}", args.from);
    Ok(0)
}

/// Execute `remit reclaim`.
pub fn run_reclaim(args: &ReclaimArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;
    let amount = state
        .ledger
        .reclaim(&state.tick, &args.from, &args.key, &mut state.accounts)
        .map_err(|e| rejected("reclaim", e))?;

    state.save(state_path)?;
    println!("OK: reclaimed {amount} to {}", args.from);
    Ok(0)
}

/// Execute `remit query`. Exits 1 for an unknown key.
pub fn run_query(args: &QueryArgs, state_path: &Path) -> Result<u8> {
    let state = StateFile::load(state_path)?;
    let Some(record) = state.ledger.query(&args.key) else {
        println!("No escrow for {}", args.key);
        return Ok(1);
    };

    println!("Escrow: {}", args.key);
    println!("  Status: {}", record.status());
    println!("  Amount: {}", record.amount);
    println!("  Deadline: {}", record.deadline);
    println!("  Issuer: {}", record.issuer);
    println!("  Recipient: {}", record.recipient);
    println!("  Claimed: {}", record.claimed);
    if record.is_claimable_at(state.tick) {
        println!("  Claimable until {} (now {})", record.deadline, state.tick);
    } else if record.is_reclaimable_at(state.tick) {
        println!("  Reclaimable by issuer (now {})", state.tick);
    }
    Ok(0)
}

/// Execute `remit events`.
pub fn run_events(args: &EventsArgs, state_path: &Path) -> Result<u8> {
    let state = StateFile::load(state_path)?;
    let events = state.ledger.events();
    if events.is_empty() && !args.json {
        println!("No events.");
        return Ok(0);
    }
    for event in events {
        if args.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{event}");
        }
    }
    Ok(0)
}
