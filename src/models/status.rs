use serde::Serialize;

/// Current presence state of an identity, derived from its last ledger event.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Status {
    NeverCheckedIn,
    CheckedIn,
    CheckedOut,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NeverCheckedIn => "never checked in",
            Status::CheckedIn => "checked in",
            Status::CheckedOut => "checked out",
        }
    }
}
