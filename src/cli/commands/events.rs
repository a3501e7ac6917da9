use chrono::NaiveDateTime;

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::ui::messages::{header, success};
use crate::utils::{date, time};

use super::open_store;

fn print_events(events: &[Event]) {
    header("Events");
    for ev in events {
        let mut flags = String::new();
        if ev.synthetic {
            flags.push_str(" [synthetic]");
        }
        if let Some(tag) = &ev.pending_id {
            flags.push_str(&format!(" [pending '{}']", tag));
        }
        println!(
            "{:>5}  {}  {:<8}  {}  {}{}",
            ev.id,
            ev.at_str(),
            ev.kind.to_db_str(),
            ev.identity_id,
            ev.display_name,
            flags
        );
    }
}

/// "HH:MM" resolves on today; a full "YYYY-MM-DD HH:MM" is taken as is.
fn parse_resolve_instant(s: &str) -> AppResult<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    let t = time::parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
    Ok(date::today().and_time(t))
}

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Events {
        id,
        date: date_arg,
        from,
        to,
        del,
        resolve,
        at,
    } = cmd
    {
        let store = open_store(cfg, cli.passphrase.as_deref())?;

        if let Some(id) = del {
            store.delete_event(*id)?;
            success(format!("Event {} deleted.", id));
            return Ok(());
        }

        if let Some(tag) = resolve {
            let at = at
                .as_deref()
                .ok_or_else(|| AppError::InvalidTime("--resolve requires --at".into()))?;
            let instant = parse_resolve_instant(at)?;
            let ev = store.resolve_pending(tag, instant)?;
            success(format!(
                "Pending checkout '{}' resolved to {}.",
                tag,
                ev.at_str()
            ));
            return Ok(());
        }

        let events = if let Some(identity_id) = id {
            store.events_for_identity(identity_id)?
        } else if let Some(s) = date_arg {
            let d = date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?;
            store.events_for_range(d, d)?
        } else if from.is_some() || to.is_some() {
            let lo = from
                .as_deref()
                .and_then(date::parse_date)
                .ok_or_else(|| AppError::InvalidDate("--from".into()))?;
            let hi = to
                .as_deref()
                .and_then(date::parse_date)
                .ok_or_else(|| AppError::InvalidDate("--to".into()))?;
            store.events_for_range(lo, hi)?
        } else {
            store.all_events()?
        };

        print_events(&events);
    }
    Ok(())
}
