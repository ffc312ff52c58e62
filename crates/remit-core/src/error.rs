//! # Error Types
//!
//! Errors shared by every crate in the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Ledger transition errors live next to the ledger in `remit-state`;
//! this module only covers parsing of the primitive types and
//! configuration loading, which every layer needs.

use thiserror::Error;

/// Top-level error type for the primitive layer.
#[derive(Error, Debug)]
pub enum RemitError {
    /// A hex-encoded address or commitment key failed to parse.
    #[error("hex error: {0}")]
    Hex(#[from] HexError),

    /// Configuration could not be parsed or is out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error parsing a fixed-width hex identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// The string has the wrong number of hex digits.
    #[error("expected {expected} hex chars, got {actual}")]
    Length {
        /// Required number of hex digits (without the `0x` prefix).
        expected: usize,
        /// Number of hex digits supplied.
        actual: usize,
    },

    /// The string contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {found:?} at position {position}")]
    InvalidChar {
        /// The offending character.
        found: char,
        /// Its position after the optional `0x` prefix.
        position: usize,
    },
}
