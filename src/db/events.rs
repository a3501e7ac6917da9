//! Append-only event ledger. The ledger performs no validation — the gate
//! owns the alternation invariant — so back-filling and tests can insert
//! arbitrary sequences. Ordering everywhere is (at, id): the insertion id
//! breaks timestamp ties deterministically.

use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::event_kind::EventKind;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Result, Row, params};

const AT_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn map_row(row: &Row) -> Result<Event> {
    let at_str: String = row.get("at")?;
    let at = NaiveDateTime::parse_from_str(&at_str, AT_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(at_str.clone())),
        )
    })?;

    let kind_str: String = row.get("kind")?;
    let kind = EventKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidKind(kind_str.clone())),
        )
    })?;

    Ok(Event {
        id: row.get("id")?,
        identity_id: row.get("identity_id")?,
        display_name: row.get("display_name")?,
        display_name_encrypted: row.get::<_, i32>("display_name_encrypted")? == 1,
        kind,
        at,
        synthetic: row.get::<_, i32>("synthetic")? == 1,
        pending_id: row.get("pending_id")?,
        created_at: row.get("created_at")?,
    })
}

/// Append an event and return it with the assigned ledger id.
pub fn insert_event(conn: &Connection, ev: &Event) -> AppResult<Event> {
    conn.execute(
        "INSERT INTO events
           (identity_id, display_name, display_name_encrypted, kind, at,
            synthetic, pending_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            ev.identity_id,
            ev.display_name,
            if ev.display_name_encrypted { 1 } else { 0 },
            ev.kind.to_db_str(),
            ev.at.format(AT_FMT).to_string(),
            if ev.synthetic { 1 } else { 0 },
            ev.pending_id,
            ev.created_at,
        ],
    )?;

    let mut stored = ev.clone();
    stored.id = conn.last_insert_rowid();
    Ok(stored)
}

pub fn all_events(conn: &Connection) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare("SELECT * FROM events ORDER BY at, id")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn events_for_identity(conn: &Connection, identity_id: &str) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare("SELECT * FROM events WHERE identity_id = ?1 ORDER BY at, id")?;
    let rows = stmt.query_map([identity_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events inside the local midnight-to-midnight window of one day.
/// Rows with malformed timestamps or kinds are skipped, not fatal: the
/// summary path must survive externally-edited data.
pub fn events_for_day(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM events
         WHERE at >= ?1 AND at < ?2
         ORDER BY at, id",
    )?;

    let start = format!("{} 00:00:00", date.format("%Y-%m-%d"));
    let end = format!(
        "{} 00:00:00",
        date.succ_opt().unwrap_or(*date).format("%Y-%m-%d")
    );

    let rows = stmt.query_map([start, end], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        match r {
            Ok(ev) => out.push(ev),
            Err(rusqlite::Error::FromSqlConversionFailure(..)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

/// Events across an inclusive day range, lenient like events_for_day.
pub fn events_for_range(
    conn: &Connection,
    start: &NaiveDate,
    end: &NaiveDate,
) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM events
         WHERE at >= ?1 AND at < ?2
         ORDER BY at, id",
    )?;

    let lo = format!("{} 00:00:00", start.format("%Y-%m-%d"));
    let hi = format!(
        "{} 00:00:00",
        end.succ_opt().unwrap_or(*end).format("%Y-%m-%d")
    );

    let rows = stmt.query_map([lo, hi], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        match r {
            Ok(ev) => out.push(ev),
            Err(rusqlite::Error::FromSqlConversionFailure(..)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

/// Last event for an identity by (at, id); None if the identity never
/// produced one.
pub fn last_event_for_identity(conn: &Connection, identity_id: &str) -> AppResult<Option<Event>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM events
         WHERE identity_id = ?1
         ORDER BY at DESC, id DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map([identity_id], map_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

pub fn delete_event(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("event {}", id)));
    }
    Ok(())
}

/// The one narrow update the ledger allows: fix the timestamp of a pending
/// checkout and clear its pending tag. Everything else stays immutable.
pub fn resolve_pending(conn: &Connection, pending_id: &str, at: NaiveDateTime) -> AppResult<Event> {
    let id: Option<i64> = {
        let mut stmt = conn.prepare("SELECT id FROM events WHERE pending_id = ?1 LIMIT 1")?;
        let mut rows = stmt.query_map([pending_id], |row| row.get(0))?;
        match rows.next() {
            Some(r) => Some(r?),
            None => None,
        }
    };

    let id = id.ok_or_else(|| AppError::NotFound(format!("pending event '{}'", pending_id)))?;

    conn.execute(
        "UPDATE events SET at = ?1, pending_id = NULL WHERE id = ?2",
        params![at.format(AT_FMT).to_string(), id],
    )?;

    let mut stmt = conn.prepare("SELECT * FROM events WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_row)?;
    match rows.next() {
        Some(r) => Ok(r?),
        None => Err(AppError::NotFound(format!("event {}", id))),
    }
}
