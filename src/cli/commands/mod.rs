pub mod checkin;
pub mod checkout;
pub mod config;
pub mod crypt;
pub mod db;
pub mod events;
pub mod identity;
pub mod init;
pub mod live;
pub mod log;
pub mod present;
pub mod status;
pub mod summary;

use crate::config::Config;
use crate::core::logic::Attendance;
use crate::errors::{AppError, AppResult};

/// Open the attendance store the way every handler needs it: with the field
/// cipher active only when encryption is on and the passphrase checks out.
/// Without a passphrase the store still opens; encrypted fields just stay
/// unreadable.
pub fn open_store(cfg: &Config, passphrase: Option<&str>) -> AppResult<Attendance> {
    if cfg.encryption_enabled {
        if let Some(pass) = passphrase {
            let digest = cfg
                .passphrase_digest
                .as_deref()
                .ok_or_else(|| AppError::Config("encryption enabled but no digest stored".into()))?;
            if !Attendance::verify_passphrase(pass, digest) {
                return Err(AppError::BadPassphrase);
            }
            return Attendance::open_with_passphrase(&cfg.database, pass);
        }
    }
    Attendance::open(&cfg.database)
}
