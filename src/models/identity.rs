use chrono::Local;
use serde::Serialize;

/// Role of an identity on the roster.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Role {
    Volunteer,
    Staff,
    Student,
    Mentor,
}

impl Role {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Staff => "staff",
            Role::Student => "student",
            Role::Mentor => "mentor",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "volunteer" => Some(Role::Volunteer),
            "staff" => Some(Role::Staff),
            "student" => Some(Role::Student),
            "mentor" => Some(Role::Mentor),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Volunteer
    }
}

/// Optional roster metadata supplied on upsert. Fields omitted by the caller
/// reset to their defaults: upserts replace the whole row, they never merge.
#[derive(Debug, Clone, Default)]
pub struct IdentityMeta {
    pub role: Role,
    pub expected_hours_week: f64,
    pub expected_days_week: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: String, // 8-digit, immutable
    pub display_name: String,
    pub email: Option<String>,
    pub active: bool,
    pub added_at: String, // ISO 8601
    pub role: Role,
    pub expected_hours_week: f64,
    pub expected_days_week: f64,
    /// Markers for at-rest field encryption; true means the sibling column
    /// holds hex-encoded ciphertext instead of plaintext.
    #[serde(skip)]
    pub display_name_encrypted: bool,
    #[serde(skip)]
    pub email_encrypted: bool,
}

impl Identity {
    pub fn new(id: &str, display_name: &str, email: Option<&str>, meta: IdentityMeta) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            email: email.map(|e| e.to_string()),
            active: true,
            added_at: Local::now().to_rfc3339(),
            role: meta.role,
            expected_hours_week: meta.expected_hours_week,
            expected_days_week: meta.expected_days_week,
            display_name_encrypted: false,
            email_encrypted: false,
        }
    }

    /// An 8-digit id, the badge format used by the lab.
    pub fn valid_id(id: &str) -> bool {
        id.len() == 8 && id.chars().all(|c| c.is_ascii_digit())
    }
}
