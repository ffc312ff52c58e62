//! # remit-core: Foundational Types for the Remittance Escrow
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! builds on:
//!
//! 1. **Newtype identifiers.** `Address` and `CommitmentKey` are distinct
//!    fixed-width types with validated hex constructors. No bare strings
//!    or byte slices for identifiers.
//!
//! 2. **Commitment derivation.** `CommitmentKey::derive(secret, recipient)`
//!    is the only way the workspace turns a secret into a lookup key.
//!
//! 3. **Logical time.** `Tick` and the `Clock` trait model the external
//!    block-height counter. The ledger reads it and never mutates it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `remit-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use error::{HexError, RemitError};
pub use identity::{Address, CommitmentKey, ADDRESS_LEN, COMMITMENT_KEY_LEN};
pub use temporal::{Clock, ManualClock, Tick};

/// Native value in base units.
pub type Amount = u128;
