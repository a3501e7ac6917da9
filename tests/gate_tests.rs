//! Validation gate behavior against a real database.

use chrono::{NaiveDate, NaiveDateTime};
use std::env;
use std::path::PathBuf;

use lablogger::core::logic::Attendance;
use lablogger::errors::AppError;
use lablogger::models::event_kind::EventKind;
use lablogger::models::identity::IdentityMeta;
use lablogger::models::status::Status;

fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_lablogger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    let _ = std::fs::remove_file(&db_path);
    db_path
}

fn store_with_alice(name: &str) -> Attendance {
    let store = Attendance::open(&setup_test_db(name)).expect("open store");
    store
        .add_identity("10000001", "Alice Moran", None, IdentityMeta::default())
        .expect("add identity");
    store
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn checkin_then_checkout_alternates() {
    let store = store_with_alice("gate_alternate");

    store
        .record_event("10000001", EventKind::Checkin, Some(at(9, 0)))
        .expect("checkin");
    assert_eq!(
        store.current_status("10000001").unwrap(),
        Status::CheckedIn
    );

    store
        .record_event("10000001", EventKind::Checkout, Some(at(12, 30)))
        .expect("checkout");
    assert_eq!(
        store.current_status("10000001").unwrap(),
        Status::CheckedOut
    );
}

#[test]
fn duplicate_checkin_rejected_and_stored_once() {
    let store = store_with_alice("gate_dup_in");

    store
        .record_event("10000001", EventKind::Checkin, Some(at(9, 0)))
        .expect("first checkin");

    let err = store
        .record_event("10000001", EventKind::Checkin, Some(at(9, 5)))
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));
    assert!(err.to_string().contains("10000001"));

    // exactly one stored event
    let events = store.all_events().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Checkin);
}

#[test]
fn duplicate_checkout_rejected() {
    let store = store_with_alice("gate_dup_out");

    store
        .record_event("10000001", EventKind::Checkin, Some(at(9, 0)))
        .unwrap();
    store
        .record_event("10000001", EventKind::Checkout, Some(at(10, 0)))
        .unwrap();

    let err = store
        .record_event("10000001", EventKind::Checkout, Some(at(10, 5)))
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));
    assert_eq!(store.all_events().unwrap().len(), 2);
}

#[test]
fn checkout_when_never_checked_in_scenario_d() {
    let store = store_with_alice("gate_never_in");

    let err = store
        .record_event("10000001", EventKind::Checkout, Some(at(10, 0)))
        .unwrap_err();
    assert!(matches!(err, AppError::NoOpenSession(_)));

    // ledger unchanged
    assert!(store.all_events().unwrap().is_empty());
    assert_eq!(
        store.current_status("10000001").unwrap(),
        Status::NeverCheckedIn
    );
}

#[test]
fn unknown_identity_is_unauthorized() {
    let store = store_with_alice("gate_unknown");

    let err = store
        .record_event("99999999", EventKind::Checkin, Some(at(9, 0)))
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn deactivated_identity_is_unauthorized() {
    let store = store_with_alice("gate_inactive");

    store.remove_identity("10000001").unwrap();

    let err = store
        .record_event("10000001", EventKind::Checkin, Some(at(9, 0)))
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // history is kept: the roster row still exists, just inactive
    let roster = store.list_identities().unwrap();
    assert_eq!(roster.len(), 1);
    assert!(!roster[0].active);
}

#[test]
fn events_carry_display_name_snapshot() {
    let store = store_with_alice("gate_snapshot");

    store
        .record_event("10000001", EventKind::Checkin, Some(at(9, 0)))
        .unwrap();

    // rename after the event: the stored snapshot must not change
    store
        .update_identity("10000001", "Alice M. Moran", None, IdentityMeta::default())
        .unwrap();

    let events = store.all_events().unwrap();
    assert_eq!(events[0].display_name, "Alice Moran");
}

#[test]
fn accepted_kinds_alternate_per_identity() {
    let store = store_with_alice("gate_property");
    store
        .add_identity("10000002", "Bruno Keller", None, IdentityMeta::default())
        .unwrap();

    // a mix of accepted and rejected calls
    let calls = [
        ("10000001", EventKind::Checkin, at(9, 0)),
        ("10000001", EventKind::Checkin, at(9, 1)), // rejected
        ("10000002", EventKind::Checkin, at(9, 30)),
        ("10000001", EventKind::Checkout, at(12, 0)),
        ("10000002", EventKind::Checkout, at(12, 5)),
        ("10000002", EventKind::Checkout, at(12, 6)), // rejected
        ("10000001", EventKind::Checkin, at(13, 0)),
    ];
    for (id, kind, when) in calls {
        let _ = store.record_event(id, kind, Some(when));
    }

    for id in ["10000001", "10000002"] {
        let kinds: Vec<EventKind> = store
            .all_events()
            .unwrap()
            .into_iter()
            .filter(|e| e.identity_id == id)
            .map(|e| e.kind)
            .collect();

        assert!(!kinds.is_empty());
        assert_eq!(kinds[0], EventKind::Checkin);
        for pair in kinds.windows(2) {
            assert_ne!(pair[0], pair[1], "kinds must alternate for {}", id);
        }
    }
}

#[test]
fn upsert_replaces_all_fields() {
    let store = store_with_alice("gate_upsert");

    store
        .add_identity(
            "10000001",
            "Alice Moran",
            Some("alice@lab.test"),
            IdentityMeta {
                expected_hours_week: 12.0,
                ..IdentityMeta::default()
            },
        )
        .unwrap();

    // resend without email and meta: fields reset, not merged
    store
        .add_identity("10000001", "Alice Moran", None, IdentityMeta::default())
        .unwrap();

    let roster = store.list_identities().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].email, None);
    assert_eq!(roster[0].expected_hours_week, 0.0);
}
