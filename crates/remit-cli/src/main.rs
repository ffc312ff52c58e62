//! # remit CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use remit_cli::account::{run_balance, run_deposit, BalanceArgs, DepositArgs};
use remit_cli::admin::{run_init, run_mine, run_pause, run_resume, GuardArgs, InitArgs, MineArgs};
use remit_cli::escrow::{
    run_claim, run_create, run_events, run_key, run_query, run_reclaim, ClaimArgs, CreateArgs,
    EventsArgs, KeyArgs, QueryArgs, ReclaimArgs,
};
use remit_cli::DEFAULT_STATE_FILE;

/// Hash-locked remittance escrow.
///
/// Lock funds under a commitment to a secret and a recipient address; the
/// recipient claims with the secret before the deadline, otherwise the
/// issuer reclaims.
#[derive(Parser, Debug)]
#[command(name = "remit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the state file.
    #[arg(long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Ledger configuration (YAML), read by `init`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new state file with an empty ledger.
    Init(InitArgs),
    /// Credit test funds to an account.
    Deposit(DepositArgs),
    /// Derive the commitment key for a secret and recipient.
    Key(KeyArgs),
    /// Lock funds under a commitment key.
    Create(CreateArgs),
    /// Redeem a secret as the recipient.
    Claim(ClaimArgs),
    /// Take back an expired escrow as the issuer.
    Reclaim(ReclaimArgs),
    /// Pause all escrow operations (administrator only).
    Pause(GuardArgs),
    /// Resume escrow operations (administrator only).
    Resume(GuardArgs),
    /// Show one escrow record.
    Query(QueryArgs),
    /// Advance the logical clock.
    Mine(MineArgs),
    /// Show account balances.
    Balance(BalanceArgs),
    /// Print the ledger's event log.
    Events(EventsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(state = %cli.state.display(), "remit starting");

    let state = cli.state.as_path();
    let result = match &cli.command {
        Commands::Init(args) => run_init(args, state, cli.config.as_deref()),
        Commands::Deposit(args) => run_deposit(args, state),
        Commands::Key(args) => run_key(args),
        Commands::Create(args) => run_create(args, state),
        Commands::Claim(args) => run_claim(args, state),
        Commands::Reclaim(args) => run_reclaim(args, state),
        Commands::Pause(args) => run_pause(args, state),
        Commands::Resume(args) => run_resume(args, state),
        Commands::Query(args) => run_query(args, state),
        Commands::Mine(args) => run_mine(args, state),
        Commands::Balance(args) => run_balance(args, state),
        Commands::Events(args) => run_events(args, state),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
