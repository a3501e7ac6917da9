//! Unified application error type.
//! All modules (db, core, cli, crypto, utils) return AppError to keep the
//! error handling consistent and easy to manage. Rejections from the
//! validation gate (Unauthorized, Duplicate, NoOpenSession) are ordinary Err
//! values, not faults: callers are expected to match on them.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid event kind: {0}")]
    InvalidKind(String),

    #[error("Invalid identity id '{0}': expected 8 digits")]
    InvalidIdentityId(String),

    // ---------------------------
    // Gate rejections (expected, recoverable)
    // ---------------------------
    #[error("Identity {0} is not on the active roster")]
    Unauthorized(String),

    #[error("Duplicate event: {0}")]
    Duplicate(String),

    #[error("No open session for identity {0}")]
    NoOpenSession(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Crypto errors
    // ---------------------------
    #[error("Cipher error: {0}")]
    Crypto(String),

    #[error("Passphrase verification failed")]
    BadPassphrase,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
