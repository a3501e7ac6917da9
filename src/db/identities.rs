//! Roster persistence. The store itself does no authorization logic beyond
//! the active flag; the validation gate decides who may record events.

use crate::errors::{AppError, AppResult};
use crate::models::identity::{Identity, Role};
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Identity> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid role: {}", role_str))),
        )
    })?;

    Ok(Identity {
        id: row.get("id")?,
        display_name: row.get("display_name")?,
        email: row.get("email")?,
        active: row.get::<_, i32>("active")? == 1,
        added_at: row.get("added_at")?,
        role,
        expected_hours_week: row.get("expected_hours_week")?,
        expected_days_week: row.get("expected_days_week")?,
        display_name_encrypted: row.get::<_, i32>("display_name_encrypted")? == 1,
        email_encrypted: row.get::<_, i32>("email_encrypted")? == 1,
    })
}

/// Insert or fully replace a roster row. Upserts replace every field: a
/// caller that omits meta gets defaults back, never the previous values.
pub fn upsert_identity(conn: &Connection, identity: &Identity) -> AppResult<()> {
    conn.execute(
        "INSERT INTO identities
           (id, display_name, email, active, added_at, role,
            expected_hours_week, expected_days_week,
            display_name_encrypted, email_encrypted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
           display_name = excluded.display_name,
           email = excluded.email,
           active = excluded.active,
           role = excluded.role,
           expected_hours_week = excluded.expected_hours_week,
           expected_days_week = excluded.expected_days_week,
           display_name_encrypted = excluded.display_name_encrypted,
           email_encrypted = excluded.email_encrypted",
        params![
            identity.id,
            identity.display_name,
            identity.email,
            if identity.active { 1 } else { 0 },
            identity.added_at,
            identity.role.to_db_str(),
            identity.expected_hours_week,
            identity.expected_days_week,
            if identity.display_name_encrypted { 1 } else { 0 },
            if identity.email_encrypted { 1 } else { 0 },
        ],
    )?;
    Ok(())
}

pub fn get_identity(conn: &Connection, id: &str) -> AppResult<Option<Identity>> {
    let mut stmt = conn.prepare("SELECT * FROM identities WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// Remove from the active roster. The row is kept so historical summaries
/// keep resolving; only the active flag drops.
pub fn deactivate_identity(conn: &Connection, id: &str) -> AppResult<()> {
    let changed = conn.execute("UPDATE identities SET active = 0 WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("identity {}", id)));
    }
    Ok(())
}

pub fn list_identities(conn: &Connection) -> AppResult<Vec<Identity>> {
    let mut stmt = conn.prepare("SELECT * FROM identities ORDER BY display_name, id")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_active_identities(conn: &Connection) -> AppResult<Vec<Identity>> {
    let mut stmt =
        conn.prepare("SELECT * FROM identities WHERE active = 1 ORDER BY display_name, id")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Present AND active, or nothing.
pub fn is_authorized(conn: &Connection, id: &str) -> AppResult<Option<Identity>> {
    Ok(get_identity(conn, id)?.filter(|i| i.active))
}
