use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::event_kind::EventKind;
use crate::ui::messages::success;
use crate::utils::{date, time};

use super::open_store;

/// Build the event instant from optional --date/--at flags, default now.
pub fn event_instant(
    date_arg: Option<&String>,
    at_arg: Option<&String>,
) -> AppResult<Option<chrono::NaiveDateTime>> {
    if date_arg.is_none() && at_arg.is_none() {
        return Ok(None); // gate will use now()
    }

    let d = match date_arg {
        Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))?,
        None => date::today(),
    };
    let t = match at_arg {
        Some(s) => time::parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?,
        None => chrono::Local::now().time(),
    };

    Ok(Some(d.and_time(t)))
}

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { id, at, date } = cmd {
        let store = open_store(cfg, cli.passphrase.as_deref())?;
        let instant = event_instant(date.as_ref(), at.as_ref())?;

        let ev = store.record_event(id, EventKind::Checkin, instant)?;
        success(format!("{} checked in at {}", ev.display_name, ev.at_str()));
    }
    Ok(())
}
