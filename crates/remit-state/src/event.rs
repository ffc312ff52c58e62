//! # Ledger Events
//!
//! Append-only log of successful mutations. Every successful `create`,
//! `claim`, `reclaim`, `pause` and `resume` appends exactly one event;
//! rejected calls append nothing.
//!
//! Issuers learn a record's public commitment key from its `Created`
//! event, which is all they need to reclaim after the deadline.

use serde::{Deserialize, Serialize};

use remit_core::{Address, Amount, CommitmentKey, Tick};

/// A successful ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEvent {
    /// A record was opened.
    Created {
        /// Commitment key of the new record.
        key: CommitmentKey,
        /// Funding address.
        issuer: Address,
        /// Address allowed to claim.
        recipient: Address,
        /// Value locked.
        amount: Amount,
        /// Absolute reclaim tick.
        deadline: Tick,
        /// Tick of creation.
        tick: Tick,
    },

    /// The recipient redeemed the secret.
    Claimed {
        /// Commitment key of the settled record.
        key: CommitmentKey,
        /// Payee.
        recipient: Address,
        /// Value paid out.
        amount: Amount,
        /// Tick of the claim.
        tick: Tick,
    },

    /// The issuer took the funds back after the deadline.
    Reclaimed {
        /// Commitment key of the settled record.
        key: CommitmentKey,
        /// Payee.
        issuer: Address,
        /// Value paid out.
        amount: Amount,
        /// Tick of the reclaim.
        tick: Tick,
    },

    /// The administrator paused the ledger.
    Paused {
        /// Administrator.
        by: Address,
        /// Tick of the pause.
        tick: Tick,
    },

    /// The administrator resumed the ledger.
    Resumed {
        /// Administrator.
        by: Address,
        /// Tick of the resume.
        tick: Tick,
    },
}

impl LedgerEvent {
    /// Canonical event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "CREATED",
            Self::Claimed { .. } => "CLAIMED",
            Self::Reclaimed { .. } => "RECLAIMED",
            Self::Paused { .. } => "PAUSED",
            Self::Resumed { .. } => "RESUMED",
        }
    }

    /// The commitment key this event concerns, if any.
    pub fn key(&self) -> Option<&CommitmentKey> {
        match self {
            Self::Created { key, .. } | Self::Claimed { key, .. } | Self::Reclaimed { key, .. } => {
                Some(key)
            }
            Self::Paused { .. } | Self::Resumed { .. } => None,
        }
    }

    /// Tick at which the event happened.
    pub fn tick(&self) -> Tick {
        match self {
            Self::Created { tick, .. }
            | Self::Claimed { tick, .. }
            | Self::Reclaimed { tick, .. }
            | Self::Paused { tick, .. }
            | Self::Resumed { tick, .. } => *tick,
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created {
                key,
                issuer,
                recipient,
                amount,
                deadline,
                tick,
            } => write!(
                f,
                "{tick} CREATED {key} issuer={issuer} recipient={recipient} amount={amount} deadline={deadline}"
            ),
            Self::Claimed {
                key,
                recipient,
                amount,
                tick,
            } => write!(f, "{tick} CLAIMED {key} recipient={recipient} amount={amount}"),
            Self::Reclaimed {
                key,
                issuer,
                amount,
                tick,
            } => write!(f, "{tick} RECLAIMED {key} issuer={issuer} amount={amount}"),
            Self::Paused { by, tick } => write!(f, "{tick} PAUSED by={by}"),
            Self::Resumed { by, tick } => write!(f, "{tick} RESUMED by={by}"),
        }
    }
}
