use super::session::Session;
use serde::Serialize;

/// Per-identity attendance for one calendar day. Recomputed on every query,
/// never cached.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub identity_id: String,
    pub display_name: String,
    pub sessions: Vec<Session>,
    pub total_minutes: i64,
    /// Minutes / 60, rounded half-up to 2 decimal places.
    pub total_hours: f64,
    /// True if any session was closed (or estimated) by an auto-close rule.
    pub autoclosed: bool,
    /// Active roster member with zero events that day. Absence is a
    /// first-class summary state, not an omission.
    pub absent: bool,
}

impl DailySummary {
    pub fn absent(identity_id: &str, display_name: &str) -> Self {
        Self {
            identity_id: identity_id.to_string(),
            display_name: display_name.to_string(),
            sessions: Vec::new(),
            total_minutes: 0,
            total_hours: 0.0,
            autoclosed: false,
            absent: true,
        }
    }
}
