//! # Account Subcommands
//!
//! Balances outside the ledger. `deposit` mints test funds into an
//! account; `balance` prints one account, or every account and the
//! ledger's pool when no address is given.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use remit_core::{Address, Amount};

use crate::state::StateFile;

/// Arguments for `remit deposit`.
#[derive(Args, Debug)]
pub struct DepositArgs {
    /// Account to credit.
    #[arg(long)]
    pub to: Address,
    /// Amount in base units.
    #[arg(long)]
    pub amount: Amount,
}

/// Arguments for `remit balance`.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Account to show. Omit to list all accounts.
    #[arg(long)]
    pub of: Option<Address>,
}

/// Execute `remit deposit`.
pub fn run_deposit(args: &DepositArgs, state_path: &Path) -> Result<u8> {
    let mut state = StateFile::load(state_path)?;
    let balance = state
        .accounts
        .deposit(&args.to, args.amount)
        .context("deposit failed")?;
    state.save(state_path)?;
    println!("OK: {} balance {balance}", args.to);
    Ok(0)
}

/// Execute `remit balance`.
pub fn run_balance(args: &BalanceArgs, state_path: &Path) -> Result<u8> {
    let state = StateFile::load(state_path)?;
    match &args.of {
        Some(account) => println!("{}", state.accounts.balance_of(account)),
        None => {
            for (account, balance) in state.accounts.iter() {
                println!("{account} {balance}");
            }
            println!("ledger pool {}", state.ledger.pool());
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remit_state::LedgerConfig;

    #[test]
    fn deposit_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        StateFile::new(Address::repeat_byte(9), LedgerConfig::default())
            .unwrap()
            .save(&path)
            .unwrap();

        let who = Address::repeat_byte(1);
        let args = DepositArgs { to: who, amount: 70 };
        run_deposit(&args, &path).unwrap();
        run_deposit(&args, &path).unwrap();
        assert_eq!(StateFile::load(&path).unwrap().accounts.balance_of(&who), 140);

        assert_eq!(run_balance(&BalanceArgs { of: Some(who) }, &path).unwrap(), 0);
        assert_eq!(run_balance(&BalanceArgs { of: None }, &path).unwrap(), 0);
    }

    #[test]
    fn deposit_overflow_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        StateFile::new(Address::repeat_byte(9), LedgerConfig::default())
            .unwrap()
            .save(&path)
            .unwrap();
        let who = Address::repeat_byte(1);
        run_deposit(&DepositArgs { to: who, amount: Amount::MAX }, &path).unwrap();
        assert!(run_deposit(&DepositArgs { to: who, amount: 1 }, &path).is_err());
    }
}
