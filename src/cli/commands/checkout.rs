use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::event_kind::EventKind;
use crate::ui::messages::success;

use super::checkin::event_instant;
use super::open_store;

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkout {
        id,
        at,
        date,
        pending,
    } = cmd
    {
        let store = open_store(cfg, cli.passphrase.as_deref())?;

        if let Some(tag) = pending {
            let ev = store.record_pending_checkout(id, tag)?;
            success(format!(
                "{} checked out (pending '{}', provisional time {})",
                ev.display_name, tag, ev.at_str()
            ));
            return Ok(());
        }

        let instant = event_instant(date.as_ref(), at.as_ref())?;
        let ev = store.record_event(id, EventKind::Checkout, instant)?;
        success(format!("{} checked out at {}", ev.display_name, ev.at_str()));
    }
    Ok(())
}
