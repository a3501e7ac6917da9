use chrono::NaiveDateTime;
use serde::Serialize;

/// A derived time span between a check-in and its matching check-out.
/// Never persisted as a record of its own; only the synthetic checkout that
/// closes one may be written back to the ledger as a real event.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub in_at: NaiveDateTime,
    pub out_at: Option<NaiveDateTime>,
    pub closed: bool,
    pub synthetic_out: bool,
}

impl Session {
    pub fn open(in_at: NaiveDateTime) -> Self {
        Self {
            in_at,
            out_at: None,
            closed: false,
            synthetic_out: false,
        }
    }

    /// A span with both endpoints. The checkout is clamped to never precede
    /// the checkin: a cutoff landing before the checkin (clock or timezone
    /// skew) must not produce a negative span.
    pub fn spanning(in_at: NaiveDateTime, out_at: NaiveDateTime, closed: bool, synthetic_out: bool) -> Self {
        Self {
            in_at,
            out_at: Some(out_at.max(in_at)),
            closed,
            synthetic_out,
        }
    }

    /// Minutes between the endpoints; 0 while the session has no checkout.
    pub fn minutes(&self) -> i64 {
        match self.out_at {
            Some(out) => (out - self.in_at).num_minutes(),
            None => 0,
        }
    }
}
