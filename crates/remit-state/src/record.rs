//! # Escrow Record
//!
//! One record per commitment key. A record is either open (funds locked,
//! claimable or reclaimable depending on the tick) or settled.
//!
//! ## Terminal Representation
//!
//! Settled records are zeroed but retained: `claimed` becomes `true`,
//! `amount` drops to zero, and `deadline`, `issuer` and `recipient` stay
//! in place for audit. The value that left the ledger is kept in the
//! event log.

use serde::{Deserialize, Serialize};

use remit_core::{Address, Amount, Tick};

/// Lifecycle status derived from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Funds are locked.
    Open,
    /// Claimed or reclaimed (terminal).
    Settled,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => f.write_str("OPEN"),
            Self::Settled => f.write_str("SETTLED"),
        }
    }
}

/// A single escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Value currently locked, in base units. Zero once settled.
    pub amount: Amount,
    /// Absolute tick from which the issuer may reclaim.
    pub deadline: Tick,
    /// Address that created and funded the record.
    pub issuer: Address,
    /// Address authorized to claim.
    pub recipient: Address,
    /// True once claimed or reclaimed.
    pub claimed: bool,
}

impl EscrowRecord {
    /// An open record.
    pub fn open(amount: Amount, deadline: Tick, issuer: Address, recipient: Address) -> Self {
        Self {
            amount,
            deadline,
            issuer,
            recipient,
            claimed: false,
        }
    }

    /// Derived lifecycle status.
    pub fn status(&self) -> RecordStatus {
        if self.claimed {
            RecordStatus::Settled
        } else {
            RecordStatus::Open
        }
    }

    /// Whether the record can never again authorize a payout.
    pub fn is_terminal(&self) -> bool {
        self.claimed
    }

    /// Whether the recipient may still claim at `now`.
    pub fn is_claimable_at(&self, now: Tick) -> bool {
        !self.claimed && now < self.deadline
    }

    /// Whether the issuer may reclaim at `now`.
    pub fn is_reclaimable_at(&self, now: Tick) -> bool {
        !self.claimed && now >= self.deadline
    }

    /// Mark settled and return the amount that was locked.
    pub(crate) fn settle(&mut self) -> Amount {
        let amount = self.amount;
        self.amount = 0;
        self.claimed = true;
        amount
    }
}
