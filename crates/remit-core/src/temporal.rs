//! # Logical Time: Ticks and Clocks
//!
//! The escrow measures time in ticks of an external monotonic counter
//! (block height). The ledger reads the counter through the [`Clock`]
//! trait and never advances it.
//!
//! ## Security Invariant
//!
//! Deadline arithmetic is checked. `Tick::checked_add` returns `None`
//! instead of wrapping, so a huge offset can never produce a deadline in
//! the past.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

/// A point on the logical clock (e.g. a block height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    /// The first tick.
    pub const GENESIS: Tick = Tick(0);

    /// The raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// `self + offset`, or `None` on overflow.
    pub fn checked_add(self, offset: u64) -> Option<Tick> {
        self.0.checked_add(offset).map(Tick)
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Tick {
    fn from(value: u64) -> Self {
        Tick(value)
    }
}

/// Read-only source of the current tick.
pub trait Clock {
    /// The current tick.
    fn now(&self) -> Tick;
}

impl Clock for Tick {
    fn now(&self) -> Tick {
        *self
    }
}

/// A clock advanced by hand, for test harnesses and simulations.
///
/// Interior mutability lets callers keep advancing the clock while the
/// ledger holds a shared reference to it.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: Cell<Tick>,
}

impl ManualClock {
    /// A clock starting at `start`.
    pub fn new(start: Tick) -> Self {
        Self {
            tick: Cell::new(start),
        }
    }

    /// Advance by `n` ticks (saturating) and return the new tick.
    pub fn advance(&self, n: u64) -> Tick {
        let next = Tick(self.tick.get().0.saturating_add(n));
        self.tick.set(next);
        next
    }

    /// Advance until the clock reads at least `target`.
    ///
    /// Never moves backwards: a target at or below the current tick
    /// leaves the clock untouched.
    pub fn advance_to(&self, target: Tick) -> Tick {
        if target > self.tick.get() {
            self.tick.set(target);
        }
        self.tick.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        self.tick.get()
    }
}
