//! # Escrow Ledger
//!
//! Hash-locked escrow keyed by 256-bit commitment keys. An issuer locks
//! funds for a recipient; the recipient redeems them by presenting the
//! secret before the deadline; after the deadline the issuer may reclaim.
//!
//! ## Record Lifecycle
//!
//! ```text
//!                 claim(secret)   [now < deadline, caller = recipient]
//!   create() ──▶ OPEN ─────────────────────────────────────▶ SETTLED
//!                  │                                           ▲
//!                  └──────── reclaim(key) ─────────────────────┘
//!                   [now >= deadline, caller = issuer]
//! ```
//!
//! The claim window `[creation, deadline)` and the reclaim window
//! `[deadline, ∞)` are disjoint, so exactly one of the two settlements can
//! ever succeed for a record.
//!
//! ## Security Invariants
//!
//! - Every mutating call first consults the [`AccessGuard`]; while paused
//!   all of them fail with [`LedgerError::SystemPaused`].
//! - Calls are all-or-nothing. A rejected call leaves records, pool, event
//!   log and guard exactly as they were.
//! - Checks-effects-interactions: the record is made terminal and the pool
//!   debited before the [`Payout`] runs. A failed payout rolls the whole
//!   call back.
//! - `pool` always equals the sum of the amounts of open records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use remit_core::{Address, Amount, Clock, CommitmentKey, RemitError, Tick};

use crate::config::LedgerConfig;
use crate::event::LedgerEvent;
use crate::guard::{AccessGuard, GuardError, GuardState};
use crate::payout::{Payout, PayoutError};
use crate::record::EscrowRecord;

// ─── Errors ──────────────────────────────────────────────────────────

/// Coarse classification of ledger rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Zero value, unset recipient, offset out of range.
    InvalidInput,
    /// Wrong caller for claim, reclaim, pause or resume.
    Unauthorized,
    /// No record at the key (or wrong secret/caller combination).
    NotFound,
    /// Record already claimed or reclaimed.
    AlreadyTerminal,
    /// Reclaim before the deadline.
    NotYetEligible,
    /// Claim at or after the deadline.
    Expired,
    /// Mutating call while the guard is paused.
    SystemPaused,
    /// Create on a key that is already in use.
    Conflict,
    /// Redundant pause or resume.
    InvalidTransition,
    /// The external transfer failed; the call was rolled back.
    TransferFailed,
    /// The custodial pool cannot cover a record (corrupted state).
    CustodyShortfall,
}

/// Errors returned by ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Caller is not allowed to perform the action.
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
        /// The attempted action.
        action: &'static str,
    },

    /// No record at the key.
    #[error("no escrow for commitment {key}")]
    NotFound {
        /// The looked-up key.
        key: CommitmentKey,
    },

    /// The record was already claimed or reclaimed.
    #[error("escrow {key} is already settled")]
    AlreadyTerminal {
        /// The settled record's key.
        key: CommitmentKey,
    },

    /// Reclaim attempted before the deadline.
    #[error("escrow {key} is not reclaimable before {deadline} (now {now})")]
    NotYetEligible {
        /// Record key.
        key: CommitmentKey,
        /// First reclaimable tick.
        deadline: Tick,
        /// Tick of the attempt.
        now: Tick,
    },

    /// Claim attempted at or after the deadline.
    #[error("escrow {key} expired at {deadline} (now {now})")]
    Expired {
        /// Record key.
        key: CommitmentKey,
        /// Deadline tick.
        deadline: Tick,
        /// Tick of the attempt.
        now: Tick,
    },

    /// The guard is paused.
    #[error("ledger is paused")]
    SystemPaused,

    /// The key already holds a record.
    #[error("commitment {key} is already in use")]
    Conflict {
        /// The occupied key.
        key: CommitmentKey,
    },

    /// Redundant pause or resume.
    #[error("invalid guard transition: {from} -> {to}")]
    InvalidTransition {
        /// Current guard state.
        from: GuardState,
        /// Attempted guard state.
        to: GuardState,
    },

    /// The payout failed and the call was rolled back.
    #[error("payout failed: {0}")]
    TransferFailed(#[from] PayoutError),

    /// The pool holds less than a record claims to lock.
    #[error("custody shortfall: pool holds {pool}, records require {required}")]
    CustodyShortfall {
        /// Current pool balance.
        pool: Amount,
        /// Amount needed.
        required: Amount,
    },
}

impl LedgerError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyTerminal { .. } => ErrorKind::AlreadyTerminal,
            Self::NotYetEligible { .. } => ErrorKind::NotYetEligible,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::SystemPaused => ErrorKind::SystemPaused,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::TransferFailed(_) => ErrorKind::TransferFailed,
            Self::CustodyShortfall { .. } => ErrorKind::CustodyShortfall,
        }
    }
}

impl From<GuardError> for LedgerError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Unauthorized { caller, action } => Self::Unauthorized { caller, action },
            GuardError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            GuardError::Paused => Self::SystemPaused,
        }
    }
}

// ─── Requests ────────────────────────────────────────────────────────

/// Terms of a new escrow, supplied by the issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowTerms {
    /// `CommitmentKey::derive(secret, recipient)`, computed off-ledger.
    pub key: CommitmentKey,
    /// Ticks from now until the issuer may reclaim. Must be below
    /// `max_offset`; zero makes the record reclaimable immediately.
    pub offset: u64,
    /// Address allowed to claim.
    pub recipient: Address,
    /// Value attached to the call.
    pub funds: Amount,
}

// ─── The Ledger ──────────────────────────────────────────────────────

/// Custodial escrow ledger gated by an [`AccessGuard`].
///
/// Owns the keyed record store and the pool. Callers are passed in
/// explicitly; time is read from a [`Clock`] on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowLedger {
    config: LedgerConfig,
    guard: AccessGuard,
    records: BTreeMap<CommitmentKey, EscrowRecord>,
    pool: Amount,
    events: Vec<LedgerEvent>,
}

impl EscrowLedger {
    /// Create an empty, active ledger administered by `admin`.
    pub fn new(admin: Address, config: LedgerConfig) -> Result<Self, RemitError> {
        config.validate()?;
        Ok(Self {
            config,
            guard: AccessGuard::new(admin),
            records: BTreeMap::new(),
            pool: 0,
            events: Vec::new(),
        })
    }

    /// An empty ledger with the default configuration.
    pub fn with_default_config(admin: Address) -> Self {
        Self {
            config: LedgerConfig::default(),
            guard: AccessGuard::new(admin),
            records: BTreeMap::new(),
            pool: 0,
            events: Vec::new(),
        }
    }

    // ── Mutating operations ─────────────────────────────────────────

    /// Open a record funded with `terms.funds`.
    ///
    /// On success the funds belong to the ledger's pool. On any error the
    /// ledger is unchanged and the attached funds stay with the caller.
    pub fn create(
        &mut self,
        clock: &dyn Clock,
        caller: &Address,
        terms: EscrowTerms,
    ) -> Result<EscrowRecord, LedgerError> {
        let now = clock.now();
        let result = self.try_create(now, caller, &terms);
        match &result {
            Ok(record) => info!(
                key = %terms.key,
                issuer = %caller,
                recipient = %record.recipient,
                amount = %record.amount,
                deadline = %record.deadline,
                tick = %now,
                "escrow created"
            ),
            Err(e) => warn!(key = %terms.key, caller = %caller, tick = %now, error = %e, "create rejected"),
        }
        result
    }

    /// Redeem the escrow committed to `H(secret, caller)` and pay `caller`.
    ///
    /// Returns the amount paid.
    pub fn claim(
        &mut self,
        clock: &dyn Clock,
        caller: &Address,
        secret: &[u8],
        payout: &mut dyn Payout,
    ) -> Result<Amount, LedgerError> {
        let now = clock.now();
        let key = CommitmentKey::derive(secret, caller);
        let result = self.try_claim(now, caller, key, payout);
        match &result {
            Ok(amount) => info!(key = %key, recipient = %caller, amount = %amount, tick = %now, "escrow claimed"),
            Err(e) => warn!(key = %key, caller = %caller, tick = %now, error = %e, "claim rejected"),
        }
        result
    }

    /// Return the funds of an expired escrow to its issuer.
    ///
    /// Returns the amount paid.
    pub fn reclaim(
        &mut self,
        clock: &dyn Clock,
        caller: &Address,
        key: &CommitmentKey,
        payout: &mut dyn Payout,
    ) -> Result<Amount, LedgerError> {
        let now = clock.now();
        let result = self.try_reclaim(now, caller, *key, payout);
        match &result {
            Ok(amount) => info!(key = %key, issuer = %caller, amount = %amount, tick = %now, "escrow reclaimed"),
            Err(e) => warn!(key = %key, caller = %caller, tick = %now, error = %e, "reclaim rejected"),
        }
        result
    }

    /// Pause all mutating operations. Administrator only.
    pub fn pause(&mut self, clock: &dyn Clock, caller: &Address) -> Result<(), LedgerError> {
        let now = clock.now();
        match self.guard.pause(caller, now) {
            Ok(()) => {
                self.events.push(LedgerEvent::Paused { by: *caller, tick: now });
                info!(by = %caller, tick = %now, "ledger paused");
                Ok(())
            }
            Err(e) => {
                warn!(caller = %caller, tick = %now, error = %e, "pause rejected");
                Err(e.into())
            }
        }
    }

    /// Resume mutating operations. Administrator only.
    pub fn resume(&mut self, clock: &dyn Clock, caller: &Address) -> Result<(), LedgerError> {
        let now = clock.now();
        match self.guard.resume(caller, now) {
            Ok(()) => {
                self.events.push(LedgerEvent::Resumed { by: *caller, tick: now });
                info!(by = %caller, tick = %now, "ledger resumed");
                Ok(())
            }
            Err(e) => {
                warn!(caller = %caller, tick = %now, error = %e, "resume rejected");
                Err(e.into())
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Snapshot of the record at `key`.
    pub fn query(&self, key: &CommitmentKey) -> Option<EscrowRecord> {
        self.records.get(key).copied()
    }

    /// All records, ordered by key.
    pub fn records(&self) -> &BTreeMap<CommitmentKey, EscrowRecord> {
        &self.records
    }

    /// Value currently held in custody.
    pub fn pool(&self) -> Amount {
        self.pool
    }

    /// Sum of the amounts of all open records.
    pub fn outstanding(&self) -> Amount {
        self.records
            .values()
            .filter(|r| !r.is_terminal())
            .fold(0, |acc: Amount, r| acc.saturating_add(r.amount))
    }

    /// Whether custody matches the open records exactly and no settled
    /// record still carries value.
    pub fn is_balanced(&self) -> bool {
        self.outstanding() == self.pool
            && self
                .records
                .values()
                .all(|r| !r.is_terminal() || r.amount == 0)
    }

    /// `Ok(())` if [`is_balanced`](Self::is_balanced), otherwise a
    /// [`LedgerError::CustodyShortfall`] describing the mismatch.
    pub fn verify_custody(&self) -> Result<(), LedgerError> {
        if self.is_balanced() {
            Ok(())
        } else {
            Err(LedgerError::CustodyShortfall {
                pool: self.pool,
                required: self.outstanding(),
            })
        }
    }

    /// The access guard.
    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Whether mutating operations are currently allowed.
    pub fn is_active(&self) -> bool {
        self.guard.is_active()
    }

    /// Ordered log of successful mutations.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// The business rules this ledger was created with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ── Internals ───────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), LedgerError> {
        debug!(state = %self.guard.state(), "guard check");
        self.guard.ensure_active().map_err(LedgerError::from)
    }

    fn try_create(
        &mut self,
        now: Tick,
        caller: &Address,
        terms: &EscrowTerms,
    ) -> Result<EscrowRecord, LedgerError> {
        self.ensure_active()?;

        if terms.funds == 0 {
            return Err(LedgerError::InvalidInput(
                "escrow must be funded with a non-zero amount".to_string(),
            ));
        }
        if terms.recipient.is_zero() {
            return Err(LedgerError::InvalidInput(
                "recipient address must be set".to_string(),
            ));
        }
        if terms.offset >= self.config.max_offset {
            return Err(LedgerError::InvalidInput(format!(
                "offset {} must be below {}",
                terms.offset, self.config.max_offset
            )));
        }
        let deadline = now.checked_add(terms.offset).ok_or_else(|| {
            LedgerError::InvalidInput(format!("deadline {now} + {} overflows", terms.offset))
        })?;

        if let Some(existing) = self.records.get(&terms.key) {
            if !existing.is_terminal() || !self.config.allow_key_reuse {
                return Err(LedgerError::Conflict { key: terms.key });
            }
        }

        let pool = self.pool.checked_add(terms.funds).ok_or_else(|| {
            LedgerError::InvalidInput("custody pool would overflow".to_string())
        })?;

        let record = EscrowRecord::open(terms.funds, deadline, *caller, terms.recipient);
        self.records.insert(terms.key, record);
        self.pool = pool;
        self.events.push(LedgerEvent::Created {
            key: terms.key,
            issuer: *caller,
            recipient: terms.recipient,
            amount: terms.funds,
            deadline,
            tick: now,
        });
        Ok(record)
    }

    fn try_claim(
        &mut self,
        now: Tick,
        caller: &Address,
        key: CommitmentKey,
        payout: &mut dyn Payout,
    ) -> Result<Amount, LedgerError> {
        self.ensure_active()?;

        let record = self.open_record(&key)?;
        if now >= record.deadline {
            return Err(LedgerError::Expired {
                key,
                deadline: record.deadline,
                now,
            });
        }
        if record.recipient != *caller {
            return Err(LedgerError::Unauthorized {
                caller: *caller,
                action: "claim",
            });
        }

        self.settle_and_pay(key, *caller, payout, |amount| LedgerEvent::Claimed {
            key,
            recipient: *caller,
            amount,
            tick: now,
        })
    }

    fn try_reclaim(
        &mut self,
        now: Tick,
        caller: &Address,
        key: CommitmentKey,
        payout: &mut dyn Payout,
    ) -> Result<Amount, LedgerError> {
        self.ensure_active()?;

        let record = self.open_record(&key)?;
        if record.issuer != *caller {
            return Err(LedgerError::Unauthorized {
                caller: *caller,
                action: "reclaim",
            });
        }
        if now < record.deadline {
            return Err(LedgerError::NotYetEligible {
                key,
                deadline: record.deadline,
                now,
            });
        }

        self.settle_and_pay(key, *caller, payout, |amount| LedgerEvent::Reclaimed {
            key,
            issuer: *caller,
            amount,
            tick: now,
        })
    }

    /// The record at `key`, provided it exists and is still open.
    fn open_record(&self, key: &CommitmentKey) -> Result<EscrowRecord, LedgerError> {
        let record = self
            .records
            .get(key)
            .copied()
            .ok_or(LedgerError::NotFound { key: *key })?;
        if record.is_terminal() {
            return Err(LedgerError::AlreadyTerminal { key: *key });
        }
        Ok(record)
    }

    /// Settle the record, debit the pool, log the event, then pay.
    ///
    /// The payout runs last. If it fails, the record, pool and event log
    /// are restored.
    fn settle_and_pay(
        &mut self,
        key: CommitmentKey,
        payee: Address,
        payout: &mut dyn Payout,
        event: impl FnOnce(Amount) -> LedgerEvent,
    ) -> Result<Amount, LedgerError> {
        let before = self.open_record(&key)?;
        let pool = self
            .pool
            .checked_sub(before.amount)
            .ok_or(LedgerError::CustodyShortfall {
                pool: self.pool,
                required: before.amount,
            })?;

        let mut settled = before;
        let amount = settled.settle();
        self.records.insert(key, settled);
        self.pool = pool;
        self.events.push(event(amount));

        if let Err(e) = payout.pay(&payee, amount) {
            self.events.pop();
            self.pool = pool + amount;
            self.records.insert(key, before);
            return Err(e.into());
        }
        Ok(amount)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::payout::AccountBook;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Create { secret: u8, who: u8, to: u8, offset: u64, funds: u64 },
        Claim { secret: u8, who: u8 },
        Reclaim { secret: u8, to: u8, who: u8 },
        Pause { who: u8 },
        Resume { who: u8 },
        Mine { blocks: u64 },
    }

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n % 4 + 1)
    }

    fn secret(n: u8) -> [u8; 1] {
        [n % 3]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<u8>(), any::<u8>(), any::<u8>(), 0u64..60, 0u64..1_000).prop_map(
                |(secret, who, to, offset, funds)| Op::Create { secret, who, to, offset, funds }
            ),
            (any::<u8>(), any::<u8>()).prop_map(|(secret, who)| Op::Claim { secret, who }),
            (any::<u8>(), any::<u8>(), any::<u8>())
                .prop_map(|(secret, to, who)| Op::Reclaim { secret, to, who }),
            any::<u8>().prop_map(|who| Op::Pause { who }),
            any::<u8>().prop_map(|who| Op::Resume { who }),
            (0u64..30).prop_map(|blocks| Op::Mine { blocks }),
        ]
    }

    proptest! {
        /// Custody always balances, settled records never reopen, and
        /// rejected calls change nothing.
        #[test]
        fn random_sequences_preserve_invariants(ops in prop::collection::vec(op(), 1..60)) {
            let config = LedgerConfig { max_offset: 50, allow_key_reuse: false };
            let mut ledger = EscrowLedger::new(addr(0), config).unwrap();
            let clock = remit_core::ManualClock::new(Tick(0));
            let mut book = AccountBook::new();
            let mut deposited: Amount = 0;

            for op in ops {
                let before = ledger.clone();
                let result = match op {
                    Op::Create { secret: s, who, to, offset, funds } => {
                        let terms = EscrowTerms {
                            key: CommitmentKey::derive(&secret(s), &addr(to)),
                            offset,
                            recipient: addr(to),
                            funds: Amount::from(funds),
                        };
                        ledger.create(&clock, &addr(who), terms).map(|r| {
                            deposited += r.amount;
                        })
                    }
                    Op::Claim { secret: s, who } => {
                        ledger.claim(&clock, &addr(who), &secret(s), &mut book).map(|_| ())
                    }
                    Op::Reclaim { secret: s, to, who } => {
                        let key = CommitmentKey::derive(&secret(s), &addr(to));
                        ledger.reclaim(&clock, &addr(who), &key, &mut book).map(|_| ())
                    }
                    Op::Pause { who } => ledger.pause(&clock, &addr(who)),
                    Op::Resume { who } => ledger.resume(&clock, &addr(who)),
                    Op::Mine { blocks } => {
                        clock.advance(blocks);
                        Ok(())
                    }
                };

                if result.is_err() {
                    prop_assert_eq!(&ledger, &before);
                } else {
                    for (key, old) in before.records() {
                        if old.is_terminal() {
                            prop_assert_eq!(ledger.query(key), Some(*old));
                        }
                    }
                }
                prop_assert!(ledger.is_balanced());
                prop_assert_eq!(ledger.pool() + book.total(), deposited);
            }
        }

        /// No tick admits both a claim and a reclaim of the same record.
        #[test]
        fn claim_and_reclaim_are_exclusive(offset in 0u64..100, at in 0u64..200) {
            let recipient = Address::repeat_byte(2);
            let issuer = Address::repeat_byte(1);
            let key = CommitmentKey::derive(b"pw", &recipient);
            let terms = EscrowTerms { key, offset, recipient, funds: 10 };

            let mut a = EscrowLedger::with_default_config(Address::repeat_byte(9));
            a.create(&Tick(0), &issuer, terms).unwrap();
            let mut b = a.clone();

            let mut book = AccountBook::new();
            let claimed = a.claim(&Tick(at), &recipient, b"pw", &mut book).is_ok();
            let reclaimed = b.reclaim(&Tick(at), &issuer, &key, &mut book).is_ok();
            prop_assert!(claimed != reclaimed);
        }
    }
}
