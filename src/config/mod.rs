use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};
use crate::models::policy::ClosePolicy;

fn default_cutoff_hour() -> u32 {
    ClosePolicy::DEFAULT_CUTOFF_HOUR
}
fn default_eod_hour() -> u32 {
    23
}
fn default_eod_minute() -> u32 {
    59
}
fn default_after_minutes() -> i64 {
    60
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Default cutoff hour for auto-close policies built from the CLI.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
    #[serde(default = "default_eod_hour")]
    pub eod_hour: u32,
    #[serde(default = "default_eod_minute")]
    pub eod_minute: u32,
    /// Grace window (minutes) for check-ins at or after the cutoff.
    #[serde(default = "default_after_minutes")]
    pub after_minutes: i64,
    /// At-rest field encryption switch.
    #[serde(default)]
    pub encryption_enabled: bool,
    /// SHA-256 digest of the passphrase, for verification only. The
    /// passphrase itself is never written anywhere.
    #[serde(default)]
    pub passphrase_digest: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            cutoff_hour: default_cutoff_hour(),
            eod_hour: default_eod_hour(),
            eod_minute: default_eod_minute(),
            after_minutes: default_after_minutes(),
            encryption_enabled: false,
            passphrase_digest: None,
        }
    }
}

impl Config {
    /// Standard configuration directory for the platform.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lablogger")
    }

    /// Full path of the config file.
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("lablogger.conf")
    }

    /// Full path of the SQLite database.
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("lablogger.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_yaml::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Self::default()
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::write(Self::config_file(), yaml)?;
        Ok(())
    }

    /// Initialize configuration and database files.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config
                .save()
                .map_err(|e| io::Error::other(e.to_string()))?;
        }

        Ok(config)
    }
}
