//! Validation gate: the only sanctioned write path into the ledger.
//!
//! Per-identity state machine over the last ledger event:
//! NeverIn --checkin--> In, In --checkout--> Out, Out --checkin--> In.
//! Illegal transitions come back as typed rejections (Duplicate,
//! NoOpenSession), never as faults. Only identities on the active roster
//! may record events.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::crypto::cipher::FieldCipher;
use crate::db::{events, identities};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::event_kind::EventKind;
use crate::models::status::Status;

pub struct Gate;

impl Gate {
    /// Validate and append one event. On success exactly one event is
    /// stored; on rejection the ledger is untouched.
    pub fn record_event(
        conn: &Connection,
        cipher: &FieldCipher,
        identity_id: &str,
        kind: EventKind,
        at: NaiveDateTime,
        pending_id: Option<&str>,
    ) -> AppResult<Event> {
        let identity = identities::is_authorized(conn, identity_id)?
            .ok_or_else(|| AppError::Unauthorized(identity_id.to_string()))?;

        let state = match events::last_event_for_identity(conn, identity_id)? {
            None => Status::NeverCheckedIn,
            Some(ev) if ev.kind.is_checkin() => Status::CheckedIn,
            Some(_) => Status::CheckedOut,
        };

        match (state, kind) {
            (Status::CheckedIn, EventKind::Checkin) => {
                return Err(AppError::Duplicate(format!(
                    "identity {} is already checked in",
                    identity_id
                )));
            }
            (Status::CheckedOut, EventKind::Checkout) => {
                return Err(AppError::Duplicate(format!(
                    "identity {} is already checked out",
                    identity_id
                )));
            }
            (Status::NeverCheckedIn, EventKind::Checkout) => {
                return Err(AppError::NoOpenSession(identity_id.to_string()));
            }
            _ => {}
        }

        // snapshot the display name as it is now; reports must show the
        // name as it was at event time
        let display_name = cipher.open(&identity.display_name, identity.display_name_encrypted)?;

        let mut ev = Event::new(identity_id, &display_name, kind, at);
        ev.pending_id = pending_id.map(|p| p.to_string());

        let (sealed_name, encrypted) = cipher.seal(&ev.display_name)?;
        ev.display_name = sealed_name;
        ev.display_name_encrypted = encrypted;

        events::insert_event(conn, &ev)
    }
}
