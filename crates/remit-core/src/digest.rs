//! # Commitment Derivation
//!
//! A commitment key binds a secret to the address that is allowed to
//! redeem it:
//!
//! ```text
//! key = SHA-256(secret ‖ recipient_address)
//! ```
//!
//! The secret bytes are hashed as-is, followed by the 20 raw address
//! bytes. No length prefix is used; the address is fixed-width and always
//! last, so the encoding is unambiguous.
//!
//! ## Security Invariant
//!
//! Because the claiming address is part of the pre-image, an observer who
//! sees a secret in a pending claim cannot redirect the payout: hashing
//! the same secret with any other address yields a key that matches no
//! record.

use sha2::{Digest, Sha256};

use crate::identity::{Address, CommitmentKey};

impl CommitmentKey {
    /// Derive the commitment key for `secret` redeemable by `recipient`.
    pub fn derive(secret: &[u8], recipient: &Address) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        hasher.update(recipient.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Whether `secret`, redeemed by `claimant`, opens this commitment.
    pub fn opens_with(&self, secret: &[u8], claimant: &Address) -> bool {
        Self::derive(secret, claimant) == *self
    }
}
