//! Behavioural tests for the ledger kernel.
//!
//! `TestHost` stands in for the host environment: it keeps minted records
//! in custody, counts treasury issuance and collects every event.

use std::collections::BTreeMap;

use ledger_kernel::hashing::canonical_hash;
use ledger_kernel::{
    AssetRecord, Coin, Custody, EventSink, IssuerCapability, Ledger, LedgerConstants,
    LedgerError, LedgerEvent, MintRequest, Principal, RecordId, RecordStatus, Treasury,
};

#[derive(Default)]
struct TestHost {
    events: Vec<LedgerEvent>,
    custody: BTreeMap<RecordId, (Principal, AssetRecord)>,
    issued: u64,
}

impl EventSink for TestHost {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

impl Treasury for TestHost {
    fn mint_coin(&mut self, amount: u64) -> Coin {
        self.issued += amount;
        Coin::new(amount)
    }
}

impl Custody for TestHost {
    fn transfer(&mut self, record: AssetRecord, recipient: &Principal) {
        self.custody.insert(record.id(), (recipient.clone(), record));
    }
}

impl TestHost {
    fn take(&mut self, id: RecordId) -> AssetRecord {
        self.custody.remove(&id).expect("record in custody").1
    }
}

fn request(name: &str) -> MintRequest {
    MintRequest {
        recipient: Principal::new("alice"),
        name: name.to_string(),
        description: format!("{} description", name),
        media_reference: format!("ipfs://{}", name),
    }
}

fn setup() -> (Ledger, IssuerCapability, TestHost) {
    let mut ledger = Ledger::default();
    let cap = ledger.bring_up().unwrap();
    (ledger, cap, TestHost::default())
}

// ─────────────────────────────────────────────────────────────
// Bring-up
// ─────────────────────────────────────────────────────────────

#[test]
fn bring_up_issues_one_capability_with_zero_balance() {
    let mut ledger = Ledger::default();
    let cap = ledger.bring_up().unwrap();
    assert_eq!(cap.accrued_balance(), 0);
    assert_eq!(ledger.bring_up().unwrap_err(), LedgerError::CapabilityAlreadyIssued);
}

// ─────────────────────────────────────────────────────────────
// Mint
// ─────────────────────────────────────────────────────────────

#[test]
fn mint_large_payment_returns_change() {
    let (mut ledger, mut cap, mut host) = setup();

    let (id, change) = ledger
        .mint(&mut cap, &mut host, request("x"), Coin::new(1_000_000_000))
        .unwrap();

    assert_eq!(change.amount(), 999_999_999);
    assert_eq!(cap.accrued_balance(), 1);
    assert_eq!(host.issued, 1, "fee is funded by fresh issuance");
    assert!(ledger.is_active(id));
    assert_eq!(
        host.events,
        vec![LedgerEvent::Minted {
            record_id: id,
            recipient: Principal::new("alice"),
        }]
    );

    let (owner, record) = &host.custody[&id];
    assert_eq!(owner, &Principal::new("alice"));
    assert_eq!(record.name(), "x");
    assert_eq!(record.description(), "x description");
    assert_eq!(record.media_reference(), "ipfs://x");
}

#[test]
fn mint_exact_payment_returns_zero_change() {
    let (mut ledger, mut cap, mut host) = setup();
    let (_, change) = ledger.mint(&mut cap, &mut host, request("x"), Coin::new(1)).unwrap();
    assert!(change.is_zero());
    assert_eq!(cap.accrued_balance(), 1);
}

#[test]
fn mint_change_tracks_payment_for_any_price() {
    let mut ledger = Ledger::new(LedgerConstants {
        price: 25,
        ..LedgerConstants::default()
    });
    let mut cap = ledger.bring_up().unwrap();
    let mut host = TestHost::default();

    for paid in [25u64, 26, 100, 12_345] {
        let before = cap.accrued_balance();
        let (_, change) = ledger
            .mint(&mut cap, &mut host, request("p"), Coin::new(paid))
            .unwrap();
        assert_eq!(change.amount(), paid - 25);
        assert_eq!(cap.accrued_balance(), before + 25);
    }
}

#[test]
fn mint_underpaid_changes_nothing() {
    let (mut ledger, mut cap, mut host) = setup();
    let hash_before = canonical_hash(ledger.state());

    let err = ledger
        .mint(&mut cap, &mut host, request("x"), Coin::zero())
        .unwrap_err();

    assert_eq!(err.error(), &LedgerError::InsufficientPayment { paid: 0, price: 1 });
    assert_eq!(cap.accrued_balance(), 0);
    assert_eq!(ledger.active_count(), 0);
    assert!(host.events.is_empty());
    assert!(host.custody.is_empty());
    assert_eq!(host.issued, 0);
    assert_eq!(canonical_hash(ledger.state()), hash_before);
}

#[test]
fn underpaid_mint_hands_back_the_whole_payment() {
    let mut ledger = Ledger::new(LedgerConstants {
        price: 5,
        ..LedgerConstants::default()
    });
    let mut cap = ledger.bring_up().unwrap();
    let mut host = TestHost::default();

    let (err, payment) = ledger
        .mint(&mut cap, &mut host, request("x"), Coin::new(4))
        .unwrap_err()
        .into_parts();

    assert_eq!(err, LedgerError::InsufficientPayment { paid: 4, price: 5 });
    let mut payment = payment.expect("payment returned");
    assert_eq!(payment.amount(), 4);

    // Topped up, the same coin pays for the mint.
    payment.join(Coin::new(3)).unwrap();
    let (_, change) = ledger.mint(&mut cap, &mut host, request("x"), payment).unwrap();
    assert_eq!(change.amount(), 2);
    assert_eq!(cap.accrued_balance(), 5);
}

#[test]
fn mint_ids_are_unique_and_increasing() {
    let (mut ledger, mut cap, mut host) = setup();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();
    let (b, _) = ledger.mint(&mut cap, &mut host, request("b"), Coin::new(1)).unwrap();
    assert!(b > a);
}

// ─────────────────────────────────────────────────────────────
// Withdraw
// ─────────────────────────────────────────────────────────────

#[test]
fn two_mints_then_withdraw_drains_balance() {
    let (mut ledger, mut cap, mut host) = setup();
    ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();
    ledger.mint(&mut cap, &mut host, request("b"), Coin::new(1)).unwrap();
    assert_eq!(cap.accrued_balance(), 2);

    let coin = ledger.withdraw(&mut cap, &mut host).unwrap();
    assert_eq!(coin.amount(), 2);
    assert_eq!(cap.accrued_balance(), 0);
    assert_eq!(
        host.events.last(),
        Some(&LedgerEvent::BalanceWithdrawn { amount: 2 })
    );

    let events_before = host.events.len();
    assert_eq!(
        ledger.withdraw(&mut cap, &mut host).unwrap_err(),
        LedgerError::InsufficientBalance
    );
    assert_eq!(host.events.len(), events_before);
}

#[test]
fn withdraw_on_fresh_capability_fails() {
    let (mut ledger, mut cap, mut host) = setup();
    let hash_before = canonical_hash(ledger.state());
    assert_eq!(
        ledger.withdraw(&mut cap, &mut host).unwrap_err(),
        LedgerError::InsufficientBalance
    );
    assert_eq!(canonical_hash(ledger.state()), hash_before);
}

// ─────────────────────────────────────────────────────────────
// Burn
// ─────────────────────────────────────────────────────────────

#[test]
fn burn_destroys_exactly_one_record() {
    let (mut ledger, mut cap, mut host) = setup();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();
    let (b, _) = ledger.mint(&mut cap, &mut host, request("b"), Coin::new(1)).unwrap();
    host.events.clear();

    let record = host.take(a);
    ledger.burn(&mut host, record).unwrap();

    assert_eq!(host.events, vec![LedgerEvent::Deleted { record_id: a }]);
    assert_eq!(ledger.resolve(a), Some(RecordStatus::Destroyed));
    assert!(!ledger.is_active(a));
    assert!(ledger.is_active(b));
    assert_eq!(ledger.active_count(), 1);
}

#[test]
fn destroyed_ids_are_never_reissued() {
    let (mut ledger, mut cap, mut host) = setup();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();
    let record = host.take(a);
    ledger.burn(&mut host, record).unwrap();

    let (b, _) = ledger.mint(&mut cap, &mut host, request("b"), Coin::new(1)).unwrap();
    assert_ne!(a, b);
    assert_eq!(ledger.resolve(a), Some(RecordStatus::Destroyed));
}

#[test]
fn record_from_another_ledger_is_rejected() {
    let (mut ledger, mut cap, mut host) = setup();
    let (mut other, mut other_cap, mut other_host) = setup();

    ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();
    let record = host.take(RecordId(1));
    ledger.burn(&mut host, record).unwrap();

    // Same numeric id, destroyed here.
    let (f1, _) = other
        .mint(&mut other_cap, &mut other_host, request("f"), Coin::new(1))
        .unwrap();
    let foreign = other_host.take(f1);
    let (err, foreign) = ledger.burn(&mut host, foreign).unwrap_err().into_parts();
    assert_eq!(err, LedgerError::ForeignRecord(RecordId(1)));

    // Never issued here.
    let (f2, _) = other
        .mint(&mut other_cap, &mut other_host, request("g"), Coin::new(1))
        .unwrap();
    let never = other_host.take(f2);
    let (err, never) = ledger.burn(&mut host, never).unwrap_err().into_parts();
    assert_eq!(err, LedgerError::ForeignRecord(RecordId(2)));

    // Both handles still work where they came from.
    other.burn(&mut other_host, foreign.expect("handle returned")).unwrap();
    other.burn(&mut other_host, never.expect("handle returned")).unwrap();
    assert_eq!(other.active_count(), 0);
}

#[test]
fn foreign_record_cannot_destroy_a_live_record_with_the_same_id() {
    let (mut ledger, mut cap, mut host) = setup();
    let (mut other, mut other_cap, mut other_host) = setup();

    let (mine, _) = ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();
    let (theirs, _) = other
        .mint(&mut other_cap, &mut other_host, request("b"), Coin::new(1))
        .unwrap();
    assert_eq!(mine, theirs);
    assert_ne!(ledger.tag(), other.tag());

    let hash_before = canonical_hash(ledger.state());
    let foreign = other_host.take(theirs);
    let (err, foreign) = ledger.burn(&mut host, foreign).unwrap_err().into_parts();

    assert_eq!(err, LedgerError::ForeignRecord(mine));
    assert!(ledger.is_active(mine));
    assert_eq!(canonical_hash(ledger.state()), hash_before);
    assert_eq!(host.events.len(), 1);

    // The real owner's handle is unaffected.
    let record = host.take(mine);
    ledger.burn(&mut host, record).unwrap();
    assert_eq!(ledger.resolve(mine), Some(RecordStatus::Destroyed));
    assert_eq!(foreign.map(|r| r.ledger()), Some(other.tag()));
}

#[test]
fn capability_from_another_ledger_is_rejected_before_any_effect() {
    let (mut ledger, mut cap, mut host) = setup();
    let (mut other, _other_cap, mut other_host) = setup();
    ledger.mint(&mut cap, &mut host, request("a"), Coin::new(1)).unwrap();

    let hash_before = canonical_hash(other.state());
    let (err, payment) = other
        .mint(&mut cap, &mut other_host, request("x"), Coin::new(3))
        .unwrap_err()
        .into_parts();

    assert_eq!(err, LedgerError::ForeignCapability);
    assert_eq!(payment.map(|c| c.amount()), Some(3));
    assert_eq!(cap.accrued_balance(), 1);
    assert_eq!(canonical_hash(other.state()), hash_before);
    assert!(other_host.events.is_empty());
    assert!(other_host.custody.is_empty());
    assert_eq!(other_host.issued, 0);

    assert_eq!(
        other.withdraw(&mut cap, &mut other_host).unwrap_err(),
        LedgerError::ForeignCapability
    );
    assert_eq!(cap.accrued_balance(), 1);
    assert!(other_host.events.is_empty());

    // Still good on its own ledger.
    assert_eq!(ledger.withdraw(&mut cap, &mut host).unwrap().amount(), 1);
}

// ─────────────────────────────────────────────────────────────
// Combine
// ─────────────────────────────────────────────────────────────

#[test]
fn combine_consumes_both_sources() {
    let (mut ledger, mut cap, mut host) = setup();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("x"), Coin::new(1)).unwrap();
    let (b, _) = ledger.mint(&mut cap, &mut host, request("y"), Coin::new(1)).unwrap();
    host.events.clear();

    let ra = host.take(a);
    let rb = host.take(b);
    let merged = ledger.combine(&mut host, ra, rb, "img").unwrap();

    assert_eq!(merged.media_reference(), "img");
    assert_eq!(merged.name(), ledger.constants().combined_name);
    assert_eq!(merged.description(), ledger.constants().combined_description);
    assert!(ledger.is_active(merged.id()));
    assert!(!ledger.is_active(a));
    assert!(!ledger.is_active(b));
    assert_eq!(ledger.active_count(), 1);

    assert_eq!(
        host.events,
        vec![
            LedgerEvent::Combined {
                source1_id: a,
                source2_id: b,
                new_id: merged.id(),
            },
            LedgerEvent::Deleted { record_id: a },
            LedgerEvent::Deleted { record_id: b },
        ]
    );
}

#[test]
fn combine_uses_configured_naming() {
    let mut ledger = Ledger::new(LedgerConstants {
        combined_name: "Fusion".to_string(),
        combined_description: "Two became one".to_string(),
        ..LedgerConstants::default()
    });
    let mut cap = ledger.bring_up().unwrap();
    let mut host = TestHost::default();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("x"), Coin::new(1)).unwrap();
    let (b, _) = ledger.mint(&mut cap, &mut host, request("y"), Coin::new(1)).unwrap();

    let (ra, rb) = (host.take(a), host.take(b));
    let merged = ledger.combine(&mut host, ra, rb, "img").unwrap();
    assert_eq!(merged.name(), "Fusion");
    assert_eq!(merged.description(), "Two became one");
}

#[test]
fn refused_combine_hands_both_sources_back() {
    let (mut ledger, mut cap, mut host) = setup();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("x"), Coin::new(1)).unwrap();
    let (b, _) = ledger.mint(&mut cap, &mut host, request("y"), Coin::new(1)).unwrap();
    let (mut other, mut other_cap, mut other_host) = setup();
    let (f, _) = other.mint(&mut other_cap, &mut other_host, request("f"), Coin::new(1)).unwrap();
    let foreign = other_host.take(f);
    let live = host.take(b);

    let hash_before = canonical_hash(ledger.state());
    let events_before = host.events.len();
    let (err, inputs) = ledger
        .combine(&mut host, foreign, live, "img")
        .unwrap_err()
        .into_parts();

    assert_eq!(err, LedgerError::ForeignRecord(RecordId(1)));
    assert_eq!(canonical_hash(ledger.state()), hash_before);
    assert_eq!(host.events.len(), events_before);

    let (foreign, live) = inputs.expect("sources returned");
    assert_eq!(foreign.ledger(), other.tag());
    assert_eq!(live.id(), b);

    // The surviving handle is still fully usable.
    let first = host.take(a);
    let merged = ledger.combine(&mut host, first, live, "img").unwrap();
    assert!(!ledger.is_active(b));
    ledger.burn(&mut host, merged).unwrap();
    assert_eq!(ledger.active_count(), 0);
    other.burn(&mut other_host, foreign).unwrap();
}

#[test]
fn combined_record_can_be_burned() {
    let (mut ledger, mut cap, mut host) = setup();
    let (a, _) = ledger.mint(&mut cap, &mut host, request("x"), Coin::new(1)).unwrap();
    let (b, _) = ledger.mint(&mut cap, &mut host, request("y"), Coin::new(1)).unwrap();
    let (ra, rb) = (host.take(a), host.take(b));
    let merged = ledger.combine(&mut host, ra, rb, "img").unwrap();
    let merged_id = merged.id();

    ledger.burn(&mut host, merged).unwrap();
    assert_eq!(ledger.active_count(), 0);
    assert_eq!(ledger.resolve(merged_id), Some(RecordStatus::Destroyed));
    assert_eq!(ledger.state().stats.burned, 3);
}

// ─────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────

#[test]
fn identical_histories_hash_identically() {
    fn run() -> String {
        let (mut ledger, mut cap, mut host) = setup();
        let (a, _) = ledger.mint(&mut cap, &mut host, request("x"), Coin::new(5)).unwrap();
        let (b, _) = ledger.mint(&mut cap, &mut host, request("y"), Coin::new(5)).unwrap();
        let (ra, rb) = (host.take(a), host.take(b));
        let merged = ledger.combine(&mut host, ra, rb, "img").unwrap();
        ledger.burn(&mut host, merged).unwrap();
        let _fees = ledger.withdraw(&mut cap, &mut host).unwrap();
        canonical_hash(ledger.state())
    }
    assert_eq!(run(), run());
}
