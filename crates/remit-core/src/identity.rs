//! # Identifier Newtypes
//!
//! Fixed-width identifiers used by the escrow: 20-byte account
//! addresses and 256-bit commitment keys. Both render as `0x`-prefixed
//! lowercase hex and serialize as hex strings, so they can be used as
//! JSON map keys in persisted ledger state.
//!
//! ## Security Invariant
//!
//! Type-level distinction between addresses and commitment keys prevents
//! passing a recipient where a lookup key is expected (and vice versa).
//! `Address::ZERO` is the "unset" address and is never accepted as a
//! recipient by the ledger.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HexError;

/// Width of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Width of a commitment key in bytes.
pub const COMMITMENT_KEY_LEN: usize = 32;

/// A 20-byte account address (issuer, recipient, administrator).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// A 256-bit commitment key binding a secret to a recipient address.
///
/// Opaque to the ledger: it is the sole lookup key into the escrow map.
/// See [`CommitmentKey::derive`](crate::digest) for how callers build one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CommitmentKey(pub [u8; COMMITMENT_KEY_LEN]);

impl Address {
    /// The unset address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// An address whose every byte is `byte`. Handy for fixtures.
    pub fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    /// Whether this is the unset address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl CommitmentKey {
    /// Create a commitment key from raw bytes.
    pub fn from_bytes(bytes: [u8; COMMITMENT_KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// Shared hex rendering, parsing and serde for the fixed-width newtypes.
macro_rules! impl_hex_identifier {
    ($ty:ident, $len:expr) => {
        impl $ty {
            /// Return the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Render as `0x`-prefixed lowercase hex.
            pub fn to_hex(&self) -> String {
                let mut s = String::with_capacity(2 + $len * 2);
                s.push_str("0x");
                for b in &self.0 {
                    s.push_str(&format!("{b:02x}"));
                }
                s
            }

            /// Parse from hex, with or without the `0x` prefix.
            pub fn from_hex(s: &str) -> Result<Self, HexError> {
                decode_fixed::<$len>(s).map(Self)
            }
        }

        impl FromStr for $ty {
            type Err = HexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.to_hex())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let hex = String::deserialize(deserializer)?;
                Self::from_hex(&hex).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_hex_identifier!(Address, ADDRESS_LEN);
impl_hex_identifier!(CommitmentKey, COMMITMENT_KEY_LEN);

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let actual = digits.chars().count();
    if actual != N * 2 {
        return Err(HexError::Length {
            expected: N * 2,
            actual,
        });
    }

    let mut out = [0u8; N];
    for (position, found) in digits.chars().enumerate() {
        let nibble = found
            .to_digit(16)
            .ok_or(HexError::InvalidChar { found, position })? as u8;
        out[position / 2] = (out[position / 2] << 4) | nibble;
    }
    Ok(out)
}
