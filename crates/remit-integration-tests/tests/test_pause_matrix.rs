//! Every mutating escrow call against every guard state, plus the
//! administrator-only and no-redundant-transition rules.

use remit_core::{Address, CommitmentKey, Tick};
use remit_state::{
    AccountBook, ErrorKind, EscrowLedger, EscrowTerms, GuardState, LedgerError,
};

fn admin() -> Address {
    Address::repeat_byte(0xAA)
}

fn issuer() -> Address {
    Address::repeat_byte(1)
}

fn recipient() -> Address {
    Address::repeat_byte(2)
}

fn terms(secret: &[u8], offset: u64) -> EscrowTerms {
    EscrowTerms {
        key: CommitmentKey::derive(secret, &recipient()),
        offset,
        recipient: recipient(),
        funds: 10,
    }
}

/// Ledger with one claimable (`c`) and one reclaimable (`r`) record at tick 5.
fn seeded() -> EscrowLedger {
    let mut ledger = EscrowLedger::with_default_config(admin());
    ledger.create(&Tick(5), &issuer(), terms(b"c", 100)).unwrap();
    ledger.create(&Tick(5), &issuer(), terms(b"r", 0)).unwrap();
    ledger
}

type Call = fn(&mut EscrowLedger, &mut AccountBook) -> Result<(), LedgerError>;

fn do_create(ledger: &mut EscrowLedger, _book: &mut AccountBook) -> Result<(), LedgerError> {
    ledger
        .create(&Tick(5), &issuer(), terms(b"new", 10))
        .map(|_| ())
}

fn do_claim(ledger: &mut EscrowLedger, book: &mut AccountBook) -> Result<(), LedgerError> {
    ledger
        .claim(&Tick(5), &recipient(), b"c", book)
        .map(|_| ())
}

fn do_reclaim(ledger: &mut EscrowLedger, book: &mut AccountBook) -> Result<(), LedgerError> {
    let key = CommitmentKey::derive(b"r", &recipient());
    ledger
        .reclaim(&Tick(5), &issuer(), &key, book)
        .map(|_| ())
}

fn calls() -> [(&'static str, Call); 3] {
    [
        ("create", do_create),
        ("claim", do_claim),
        ("reclaim", do_reclaim),
    ]
}

#[test]
fn every_mutation_succeeds_while_active() {
    for (name, call) in calls() {
        let mut ledger = seeded();
        let mut book = AccountBook::new();
        assert!(call(&mut ledger, &mut book).is_ok(), "{name} should succeed");
    }
}

#[test]
fn every_mutation_fails_while_paused() {
    for (name, call) in calls() {
        let mut ledger = seeded();
        ledger.pause(&Tick(5), &admin()).unwrap();
        let snapshot = ledger.clone();

        let mut book = AccountBook::new();
        let err = call(&mut ledger, &mut book).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SystemPaused, "{name}");
        assert_eq!(ledger, snapshot, "{name} changed a paused ledger");
        assert_eq!(book.total(), 0);
    }
}

#[test]
fn every_mutation_succeeds_after_resume() {
    for (name, call) in calls() {
        let mut ledger = seeded();
        ledger.pause(&Tick(5), &admin()).unwrap();
        ledger.resume(&Tick(6), &admin()).unwrap();
        let mut book = AccountBook::new();
        assert!(call(&mut ledger, &mut book).is_ok(), "{name} after resume");
    }
}

#[test]
fn queries_stay_available_while_paused() {
    let mut ledger = seeded();
    ledger.pause(&Tick(5), &admin()).unwrap();
    let key = CommitmentKey::derive(b"c", &recipient());
    assert_eq!(ledger.query(&key).unwrap().amount, 10);
    assert_eq!(ledger.pool(), 20);
    assert!(ledger.is_balanced());
}

#[test]
fn guard_transitions_require_admin_and_a_state_change() {
    let mut ledger = seeded();
    let outsider = issuer();

    let err = ledger.pause(&Tick(5), &outsider).unwrap_err();
    assert_eq!(
        err,
        LedgerError::Unauthorized {
            caller: outsider,
            action: "pause"
        }
    );
    assert!(ledger.is_active());

    assert_eq!(
        ledger.resume(&Tick(5), &admin()).unwrap_err(),
        LedgerError::InvalidTransition {
            from: GuardState::Active,
            to: GuardState::Active
        }
    );

    ledger.pause(&Tick(5), &admin()).unwrap();
    assert_eq!(
        ledger.pause(&Tick(6), &admin()).unwrap_err().kind(),
        ErrorKind::InvalidTransition
    );
    assert_eq!(
        ledger.resume(&Tick(6), &outsider).unwrap_err().kind(),
        ErrorKind::Unauthorized
    );

    ledger.resume(&Tick(7), &admin()).unwrap();
    let log = ledger.guard().transitions();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].to, GuardState::Paused);
    assert_eq!(log[0].tick, Tick(5));
    assert_eq!(log[1].to, GuardState::Active);
    assert_eq!(log[1].by, admin());
}
