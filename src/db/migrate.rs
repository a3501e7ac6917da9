use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the `events` table exists.
fn events_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='events'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if the `events` table has a `pending_id` column.
fn events_has_pending_column(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('events')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "pending_id" {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `identities` table (roster) with the modern schema.
fn create_identities_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS identities (
            id                     TEXT PRIMARY KEY,
            display_name           TEXT NOT NULL,
            email                  TEXT,
            active                 INTEGER NOT NULL DEFAULT 1,
            added_at               TEXT NOT NULL,
            role                   TEXT NOT NULL DEFAULT 'volunteer'
                                   CHECK(role IN ('volunteer','staff','student','mentor')),
            expected_hours_week    REAL NOT NULL DEFAULT 0,
            expected_days_week     REAL NOT NULL DEFAULT 0,
            display_name_encrypted INTEGER NOT NULL DEFAULT 0,
            email_encrypted        INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}

/// Create the `events` table (append-only ledger) with the modern schema.
fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id                     INTEGER PRIMARY KEY AUTOINCREMENT,
            identity_id            TEXT NOT NULL,
            display_name           TEXT NOT NULL DEFAULT '',
            display_name_encrypted INTEGER NOT NULL DEFAULT 0,
            kind                   TEXT NOT NULL CHECK(kind IN ('checkin','checkout')),
            at                     TEXT NOT NULL,
            synthetic              INTEGER NOT NULL DEFAULT 0,
            pending_id             TEXT,
            created_at             TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_events_identity_at ON events(identity_id, at);
        CREATE INDEX IF NOT EXISTS idx_events_at ON events(at);
        "#,
    )?;
    Ok(())
}

/// Migrate a pre-0.3 `events` table to include the `pending_id` column.
fn migrate_add_pending_column(conn: &Connection) -> Result<()> {
    let version = "20260115_0003_add_pending_id";

    // 1) Skip if already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    // 2) Apply
    conn.execute("ALTER TABLE events ADD COLUMN pending_id TEXT;", [])?;

    // 3) Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added pending_id to events')",
        [version],
    )?;

    success(format!(
        "Migration applied: {} → added 'pending_id' to events table",
        version
    ));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Roster table is idempotent CREATE IF NOT EXISTS
    create_identities_table(conn)?;

    // 3) Events table: create fresh, or upgrade in place
    if !events_table_exists(conn)? {
        create_events_table(conn)?;
    } else if !events_has_pending_column(conn)? {
        migrate_add_pending_column(conn)?;
    } else {
        conn.execute_batch(
            r#"
            CREATE INDEX IF NOT EXISTS idx_events_identity_at ON events(identity_id, at);
            CREATE INDEX IF NOT EXISTS idx_events_at ON events(at);
            "#,
        )?;
    }

    Ok(())
}
