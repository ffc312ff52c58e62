//! # remit-cli: Command-Line Driver for the Escrow Ledger
//!
//! Provides the `remit` binary. Each invocation loads a JSON state file,
//! performs one ledger call as the address given by `--from`, and writes
//! the file back on success.
//!
//! ```bash
//! remit init --admin 0x00..01
//! remit deposit --to 0x0a..0a --amount 1000
//! remit create --from 0x0a..0a --secret pw --recipient 0x0b..0b --offset 100 --value 400
//! remit claim --from 0x0b..0b --secret pw
//! remit mine --blocks 100
//! remit events
//! ```

pub mod account;
pub mod admin;
pub mod escrow;
pub mod state;

pub use state::{StateFile, DEFAULT_STATE_FILE};

use remit_state::LedgerError;

/// Wrap a ledger rejection with its kind for the top-level error report.
pub(crate) fn rejected(action: &str, err: LedgerError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("{action} rejected ({kind:?})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remit_core::Tick;
    use remit_state::ErrorKind;

    #[test]
    fn rejected_names_the_kind() {
        let err = rejected("claim", LedgerError::SystemPaused);
        assert_eq!(err.to_string(), "claim rejected (SystemPaused)");
        assert_eq!(
            err.downcast_ref::<LedgerError>().map(LedgerError::kind),
            Some(ErrorKind::SystemPaused)
        );
    }

    #[test]
    fn rejected_keeps_the_cause() {
        let err = rejected(
            "reclaim",
            LedgerError::NotYetEligible {
                key: remit_core::CommitmentKey::from_bytes([1; 32]),
                deadline: Tick(9),
                now: Tick(2),
            },
        );
        let full = format!("{err:#}");
        assert!(full.starts_with("reclaim rejected (NotYetEligible): "));
        assert!(full.contains("#9"));
    }
}
