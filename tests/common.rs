#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn lab() -> Command {
    cargo_bin_cmd!("lablogger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_lablogger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize DB and add a small roster useful for many tests
pub fn init_db_with_roster(db_path: &str) {
    lab()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    lab()
        .args([
            "--db",
            db_path,
            "--test",
            "identity",
            "add",
            "10000001",
            "Alice Moran",
        ])
        .assert()
        .success();

    lab()
        .args([
            "--db",
            db_path,
            "--test",
            "identity",
            "add",
            "10000002",
            "Bruno Keller",
            "--role",
            "mentor",
        ])
        .assert()
        .success();
}
