//! SQLite connection wrapper (lightweight for CLI usage).
//!
//! One connection, one writer: the core is synchronous and every persistence
//! call is atomic at the call boundary. Callers introducing concurrency must
//! put this behind a mutex; nothing here composes multi-call transactions.

use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self { conn })
    }
}
