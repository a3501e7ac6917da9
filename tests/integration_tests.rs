use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_roster, lab, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    lab()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_checkin_and_checkout_roundtrip() {
    let db_path = setup_test_db("cli_roundtrip");
    init_db_with_roster(&db_path);

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "checkin",
            "10000001",
            "--date",
            "2026-03-10",
            "--at",
            "09:00",
        ])
        .assert()
        .success()
        .stdout(contains("Alice Moran").and(contains("checked in")));

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "checkout",
            "10000001",
            "--date",
            "2026-03-10",
            "--at",
            "12:30",
        ])
        .assert()
        .success()
        .stdout(contains("checked out"));

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "summary",
            "2026-03-10",
            "--policy",
            "none",
        ])
        .assert()
        .success()
        .stdout(contains("Alice Moran").and(contains("3.50")))
        .stdout(contains("03:30"));
}

#[test]
fn test_duplicate_checkin_fails_with_message() {
    let db_path = setup_test_db("cli_duplicate");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "checkin", "10000001"])
        .assert()
        .success();

    lab()
        .args(["--db", &db_path, "--test", "checkin", "10000001"])
        .assert()
        .failure()
        .stderr(contains("already checked in").and(contains("10000001")));
}

#[test]
fn test_checkout_without_checkin_is_rejected() {
    let db_path = setup_test_db("cli_no_open");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "checkout", "10000001"])
        .assert()
        .failure()
        .stderr(contains("No open session"));
}

#[test]
fn test_unknown_identity_is_rejected() {
    let db_path = setup_test_db("cli_unauth");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "checkin", "99999999"])
        .assert()
        .failure()
        .stderr(contains("not on the active roster"));
}

#[test]
fn test_status_and_present() {
    let db_path = setup_test_db("cli_status");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "status", "10000001"])
        .assert()
        .success()
        .stdout(contains("never checked in"));

    lab()
        .args(["--db", &db_path, "--test", "checkin", "10000001"])
        .assert()
        .success();

    lab()
        .args(["--db", &db_path, "--test", "status", "10000001"])
        .assert()
        .success()
        .stdout(contains("checked in"));

    lab()
        .args(["--db", &db_path, "--test", "present"])
        .assert()
        .success()
        .stdout(contains("Alice Moran"));
}

#[test]
fn test_summary_write_policy_persists_synthetic_checkout() {
    let db_path = setup_test_db("cli_write_policy");
    init_db_with_roster(&db_path);

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "checkin",
            "10000001",
            "--date",
            "2026-03-10",
            "--at",
            "09:00",
        ])
        .assert()
        .success();

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "summary",
            "2026-03-10",
            "--policy",
            "write",
            "--hour",
            "17",
        ])
        .assert()
        .success()
        .stdout(contains("synthetic"));

    lab()
        .args(["--db", &db_path, "--test", "events", "--date", "2026-03-10"])
        .assert()
        .success()
        .stdout(contains("[synthetic]"));
}

#[test]
fn test_absent_member_listed_in_summary() {
    let db_path = setup_test_db("cli_absent");
    init_db_with_roster(&db_path);

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "checkin",
            "10000001",
            "--date",
            "2026-03-10",
            "--at",
            "09:00",
        ])
        .assert()
        .success();

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "summary",
            "2026-03-10",
            "--policy",
            "none",
        ])
        .assert()
        .success()
        .stdout(contains("Bruno Keller").and(contains("absent")));
}

#[test]
fn test_identity_rm_deactivates() {
    let db_path = setup_test_db("cli_identity_rm");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "identity", "rm", "10000002"])
        .assert()
        .success();

    lab()
        .args(["--db", &db_path, "--test", "identity", "list"])
        .assert()
        .success()
        .stdout(contains("Alice Moran").and(contains("Bruno Keller").not()));

    lab()
        .args(["--db", &db_path, "--test", "identity", "list", "--all"])
        .assert()
        .success()
        .stdout(contains("Bruno Keller").and(contains("inactive")));
}

#[test]
fn test_events_del_and_pending_resolve() {
    let db_path = setup_test_db("cli_events");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "checkin", "10000001"])
        .assert()
        .success();

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "checkout",
            "10000001",
            "--pending",
            "forgot-badge",
        ])
        .assert()
        .success()
        .stdout(contains("pending"));

    lab()
        .args([
            "--db",
            &db_path,
            "--test",
            "events",
            "--resolve",
            "forgot-badge",
            "--at",
            "2026-03-10 12:30",
        ])
        .assert()
        .success()
        .stdout(contains("resolved"));

    lab()
        .args(["--db", &db_path, "--test", "events", "--del", "1"])
        .assert()
        .success()
        .stdout(contains("deleted"));
}

#[test]
fn test_db_check_reports_ok() {
    let db_path = setup_test_db("cli_db_check");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "db", "--check"])
        .assert()
        .success()
        .stdout(contains("integrity: ok"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("cli_log");
    init_db_with_roster(&db_path);

    lab()
        .args(["--db", &db_path, "--test", "checkin", "10000001"])
        .assert()
        .success();

    lab()
        .args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("record_event").and(contains("upsert_identity")));
}
