//! # remit-state: Escrow Ledger and Access Guard
//!
//! The two stateful components of the remittance escrow.
//!
//! ## Components
//!
//! - **AccessGuard** (`guard.rs`): `ACTIVE ⇄ PAUSED`, driven by a single
//!   administrator fixed at construction. Redundant transitions are
//!   rejected. Keeps its own transition log.
//!
//! - **EscrowLedger** (`ledger.rs`): keyed store of escrow records plus a
//!   custodial pool. `create` locks funds under a commitment key, `claim`
//!   releases them to the recipient who knows the secret, `reclaim`
//!   returns them to the issuer after the deadline. Every mutating call is
//!   gated by the guard.
//!
//! ## Supporting Modules
//!
//! - `record.rs`: the per-key record and its claim/reclaim windows.
//! - `payout.rs`: the outbound transfer seam and the in-memory
//!   [`AccountBook`].
//! - `event.rs`: append-only log of successful mutations.
//! - `config.rs`: YAML-loadable business rules.
//!
//! ## Design
//!
//! The ledger is a plain owned value. Mutating calls take `&mut self`, so
//! calls are totally ordered and a payout cannot re-enter the ledger.
//! Time comes from a [`remit_core::Clock`] the ledger only reads.

pub mod config;
pub mod event;
pub mod guard;
pub mod ledger;
pub mod payout;
pub mod record;

// ─── Guard re-exports ───────────────────────────────────────────────

pub use guard::{AccessGuard, GuardError, GuardState, GuardTransition};

// ─── Ledger re-exports ──────────────────────────────────────────────

pub use config::{LedgerConfig, DEFAULT_MAX_OFFSET};
pub use event::LedgerEvent;
pub use ledger::{ErrorKind, EscrowLedger, EscrowTerms, LedgerError};
pub use payout::{AccountBook, Payout, PayoutError};
pub use record::{EscrowRecord, RecordStatus};
