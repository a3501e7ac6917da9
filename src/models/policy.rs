use serde::{Deserialize, Serialize};

/// Auto-close policy: the rule for fabricating a checkout when one never
/// arrived by end of day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ClosePolicy {
    /// Leave the session open, no estimate, nothing written.
    None,
    /// Read-time estimate only: report `out = max(in, cutoff at hour)` with
    /// `closed = false`. Nothing is written back.
    CapAt { hour: u32 },
    /// Same instant as CapAt, but a real synthetic checkout event is
    /// appended to the ledger and the session is closed.
    WriteAt { hour: u32 },
    /// Close at the cutoff, but never sooner than `after_minutes` past the
    /// checkin, and never past the end of day: whoever arrived near or after
    /// closing time gets a short grace window instead of an instant close.
    /// The synthetic checkout is written back like WriteAt.
    Hybrid {
        cutoff_hour: u32,
        eod_hour: u32,
        eod_minute: u32,
        after_minutes: i64,
    },
}

impl ClosePolicy {
    pub const DEFAULT_CUTOFF_HOUR: u32 = 17;

    pub fn hybrid_default() -> Self {
        ClosePolicy::Hybrid {
            cutoff_hour: Self::DEFAULT_CUTOFF_HOUR,
            eod_hour: 23,
            eod_minute: 59,
            after_minutes: 60,
        }
    }

    /// Policies that append synthetic checkouts to the ledger.
    pub fn writes_back(&self) -> bool {
        matches!(self, ClosePolicy::WriteAt { .. } | ClosePolicy::Hybrid { .. })
    }
}

impl Default for ClosePolicy {
    fn default() -> Self {
        ClosePolicy::None
    }
}
