use super::event_kind::EventKind;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,               // ⇔ events.id (INTEGER PK AUTOINCREMENT)
    pub identity_id: String,   // ⇔ events.identity_id (TEXT, 8-digit)
    pub display_name: String,  // ⇔ events.display_name (snapshot at write time)
    pub kind: EventKind,       // ⇔ events.kind ('checkin' | 'checkout')
    pub at: NaiveDateTime,     // ⇔ events.at (TEXT "YYYY-MM-DD HH:MM:SS")
    pub synthetic: bool,       // ⇔ events.synthetic (INT 0/1)
    pub pending_id: Option<String>, // ⇔ events.pending_id (TEXT, nullable)
    #[serde(skip)]
    pub display_name_encrypted: bool, // ⇔ events.display_name_encrypted
    pub created_at: String,    // ⇔ events.created_at (TEXT, ISO8601)
}

impl Event {
    /// Constructor for events produced by the validation gate.
    /// - `id = 0` means "not yet stored"; the ledger assigns the real id.
    /// - `created_at` is set to now() in ISO8601.
    pub fn new(identity_id: &str, display_name: &str, kind: EventKind, at: NaiveDateTime) -> Self {
        Self {
            id: 0,
            identity_id: identity_id.to_string(),
            display_name: display_name.to_string(),
            kind,
            at,
            synthetic: false,
            pending_id: None,
            display_name_encrypted: false,
            created_at: Local::now().to_rfc3339(),
        }
    }

    /// A policy-fabricated checkout, flagged so reports can tell it apart
    /// from a user-initiated one.
    pub fn synthetic_checkout(identity_id: &str, display_name: &str, at: NaiveDateTime) -> Self {
        let mut ev = Self::new(identity_id, display_name, EventKind::Checkout, at);
        ev.synthetic = true;
        ev
    }

    pub fn at_str(&self) -> String {
        self.at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
