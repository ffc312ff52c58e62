//! # Payout Seam
//!
//! The ledger holds funds in a single custodial pool. Paying a claimant
//! or issuer is an external transfer, modelled by the [`Payout`] trait.
//!
//! ## Ordering
//!
//! The ledger calls [`Payout::pay`] only after the record is terminal and
//! the pool has been debited. A payout receives no handle back into the
//! ledger, so it cannot re-enter `claim` or `reclaim`. If the payout
//! fails, the ledger restores its pre-call state.
//!
//! [`AccountBook`] is the in-memory implementation used by the CLI and
//! the test suites: plain balances per address.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use remit_core::{Address, Amount};

/// Errors from moving value between accounts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// Crediting would overflow the destination balance.
    #[error("balance overflow crediting {to}")]
    Overflow {
        /// Destination account.
        to: Address,
    },

    /// Debit exceeds the available balance.
    #[error("insufficient funds in {from}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Source account.
        from: Address,
        /// Current balance.
        balance: Amount,
        /// Requested debit.
        requested: Amount,
    },

    /// The destination refused the transfer.
    #[error("transfer to {to} rejected: {reason}")]
    Rejected {
        /// Destination account.
        to: Address,
        /// Why the destination refused.
        reason: String,
    },
}

/// External transfer out of the ledger's custody.
pub trait Payout {
    /// Credit `amount` to `to`.
    fn pay(&mut self, to: &Address, amount: Amount) -> Result<(), PayoutError>;
}

/// In-memory account balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBook {
    balances: BTreeMap<Address, Amount>,
}

impl AccountBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account` (zero for unknown accounts).
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Add `amount` to `account`.
    pub fn deposit(&mut self, account: &Address, amount: Amount) -> Result<Amount, PayoutError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(PayoutError::Overflow { to: *account })?;
        self.balances.insert(*account, balance);
        Ok(balance)
    }

    /// Remove `amount` from `account`.
    pub fn withdraw(&mut self, account: &Address, amount: Amount) -> Result<Amount, PayoutError> {
        let balance = self.balance_of(account);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(PayoutError::InsufficientFunds {
                from: *account,
                balance,
                requested: amount,
            })?;
        self.balances.insert(*account, remaining);
        Ok(remaining)
    }

    /// Sum of all balances (saturating).
    pub fn total(&self) -> Amount {
        self.balances
            .values()
            .fold(0, |acc: Amount, b| acc.saturating_add(*b))
    }

    /// Iterate over accounts with their balances.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }
}

impl Payout for AccountBook {
    fn pay(&mut self, to: &Address, amount: Amount) -> Result<(), PayoutError> {
        self.deposit(to, amount).map(|_| ())
    }
}
