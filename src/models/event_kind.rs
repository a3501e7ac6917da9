use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EventKind {
    Checkin,
    Checkout,
}

impl EventKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventKind::Checkin => "checkin",
            EventKind::Checkout => "checkout",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "checkin" => Some(EventKind::Checkin),
            "checkout" => Some(EventKind::Checkout),
            _ => None,
        }
    }

    pub fn is_checkin(&self) -> bool {
        matches!(self, EventKind::Checkin)
    }
}
