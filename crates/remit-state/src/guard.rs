//! # Access Guard: Administrator Pause Switch
//!
//! A two-state switch layered over every mutating escrow operation.
//!
//! ## States
//!
//! ```text
//! Active ──pause()──▶ Paused
//!    ▲                  │
//!    └─────resume()─────┘
//! ```
//!
//! The guard starts `Active`. A single administrator, fixed at
//! construction, is the only caller allowed to flip it. Redundant
//! transitions (pausing while paused, resuming while active) are
//! rejected rather than treated as no-ops.
//!
//! ## Security Invariant
//!
//! Pausing never touches escrow records. It only gates new mutating calls;
//! `query` and the other read paths stay available. There is no
//! ownership transfer: the administrator field has no setter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use remit_core::{Address, Tick};

/// The state of the access guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardState {
    /// Mutating operations are allowed.
    Active,
    /// Mutating operations are rejected.
    Paused,
}

impl GuardState {
    /// Returns the canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
        }
    }
}

impl std::fmt::Display for GuardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by the guard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// Caller is not the administrator.
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
        /// The attempted action (`"pause"` or `"resume"`).
        action: &'static str,
    },

    /// Redundant transition (e.g. pausing while already paused).
    #[error("invalid guard transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: GuardState,
        /// Attempted target state.
        to: GuardState,
    },

    /// The guard is paused and the operation is gated.
    #[error("system is paused")]
    Paused,
}

/// Record of a guard state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardTransition {
    /// State before the transition.
    pub from: GuardState,
    /// State after the transition.
    pub to: GuardState,
    /// The administrator who flipped the switch.
    pub by: Address,
    /// Tick at which the transition happened.
    pub tick: Tick,
}

/// Owner-only pause/resume switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGuard {
    admin: Address,
    state: GuardState,
    transitions: Vec<GuardTransition>,
}

impl AccessGuard {
    /// Create an active guard administered by `admin`.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            state: GuardState::Active,
            transitions: Vec::new(),
        }
    }

    /// The administrator address.
    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Current state.
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Whether mutating operations are currently allowed.
    pub fn is_active(&self) -> bool {
        self.state == GuardState::Active
    }

    /// `Ok(())` when active, [`GuardError::Paused`] otherwise.
    pub fn ensure_active(&self) -> Result<(), GuardError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GuardError::Paused)
        }
    }

    /// Ordered log of all pause/resume transitions.
    pub fn transitions(&self) -> &[GuardTransition] {
        &self.transitions
    }

    /// Pause the guard (ACTIVE → PAUSED).
    pub fn pause(&mut self, caller: &Address, tick: Tick) -> Result<(), GuardError> {
        self.try_transition(caller, GuardState::Paused, "pause", tick)
    }

    /// Resume the guard (PAUSED → ACTIVE).
    pub fn resume(&mut self, caller: &Address, tick: Tick) -> Result<(), GuardError> {
        self.try_transition(caller, GuardState::Active, "resume", tick)
    }

    fn try_transition(
        &mut self,
        caller: &Address,
        to: GuardState,
        action: &'static str,
        tick: Tick,
    ) -> Result<(), GuardError> {
        if *caller != self.admin {
            return Err(GuardError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        if self.state == to {
            return Err(GuardError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        self.transitions.push(GuardTransition {
            from: self.state,
            to,
            by: *caller,
            tick,
        });
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Address {
        Address::repeat_byte(0xAD)
    }

    fn stranger() -> Address {
        Address::repeat_byte(0x55)
    }

    #[test]
    fn new_guard_is_active() {
        let guard = AccessGuard::new(admin());
        assert!(guard.is_active());
        assert_eq!(guard.state(), GuardState::Active);
        assert_eq!(guard.admin(), &admin());
        assert!(guard.ensure_active().is_ok());
        assert!(guard.transitions().is_empty());
    }

    #[test]
    fn admin_can_pause_and_resume() {
        let mut guard = AccessGuard::new(admin());
        guard.pause(&admin(), Tick(3)).unwrap();
        assert!(!guard.is_active());
        assert_eq!(guard.ensure_active(), Err(GuardError::Paused));

        guard.resume(&admin(), Tick(4)).unwrap();
        assert!(guard.is_active());
        assert_eq!(guard.transitions().len(), 2);
        assert_eq!(guard.transitions()[0].to, GuardState::Paused);
        assert_eq!(guard.transitions()[0].tick, Tick(3));
        assert_eq!(guard.transitions()[1].from, GuardState::Paused);
        assert_eq!(guard.transitions()[1].by, admin());
    }

    #[test]
    fn stranger_cannot_pause() {
        let mut guard = AccessGuard::new(admin());
        let err = guard.pause(&stranger(), Tick(0)).unwrap_err();
        assert_eq!(
            err,
            GuardError::Unauthorized {
                caller: stranger(),
                action: "pause"
            }
        );
        assert!(guard.is_active());
    }

    #[test]
    fn stranger_cannot_resume() {
        let mut guard = AccessGuard::new(admin());
        guard.pause(&admin(), Tick(0)).unwrap();
        let err = guard.resume(&stranger(), Tick(1)).unwrap_err();
        assert!(matches!(err, GuardError::Unauthorized { action: "resume", .. }));
        assert!(!guard.is_active());
    }

    #[test]
    fn double_pause_rejected() {
        let mut guard = AccessGuard::new(admin());
        guard.pause(&admin(), Tick(0)).unwrap();
        let err = guard.pause(&admin(), Tick(1)).unwrap_err();
        assert_eq!(
            err,
            GuardError::InvalidTransition {
                from: GuardState::Paused,
                to: GuardState::Paused
            }
        );
        assert_eq!(guard.transitions().len(), 1);
    }

    #[test]
    fn resume_while_active_rejected() {
        let mut guard = AccessGuard::new(admin());
        assert!(matches!(
            guard.resume(&admin(), Tick(0)),
            Err(GuardError::InvalidTransition { .. })
        ));
        assert!(guard.transitions().is_empty());
    }

    #[test]
    fn state_serde() {
        let json = serde_json::to_string(&GuardState::Paused).unwrap();
        assert_eq!(json, "\"PAUSED\"");
        assert_eq!(GuardState::Active.to_string(), "ACTIVE");
    }

    #[test]
    fn guard_serialization() {
        let mut guard = AccessGuard::new(admin());
        guard.pause(&admin(), Tick(9)).unwrap();
        let json = serde_json::to_string(&guard).unwrap();
        let parsed: AccessGuard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, guard);
    }
}
