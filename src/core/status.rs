//! Status resolver: an identity's presence state is whatever its last
//! ledger event says.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::{events, identities};
use crate::errors::AppResult;
use crate::models::event_kind::EventKind;
use crate::models::identity::Identity;
use crate::models::status::Status;

pub fn current_status(conn: &Connection, identity_id: &str) -> AppResult<Status> {
    Ok(match events::last_event_for_identity(conn, identity_id)? {
        None => Status::NeverCheckedIn,
        Some(ev) if ev.kind == EventKind::Checkin => Status::CheckedIn,
        Some(_) => Status::CheckedOut,
    })
}

/// Active roster members currently checked in, with the timestamp of their
/// most recent checkin.
pub fn currently_present(conn: &Connection) -> AppResult<Vec<(Identity, NaiveDateTime)>> {
    let mut present = Vec::new();

    for identity in identities::list_active_identities(conn)? {
        if let Some(last) = events::last_event_for_identity(conn, &identity.id)? {
            if last.kind == EventKind::Checkin {
                present.push((identity, last.at));
            }
        }
    }

    Ok(present)
}
