use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::utils::date;

use super::open_store;
use super::summary::print_summaries;

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Live { date: date_arg } = cmd {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let store = open_store(cfg, cli.passphrase.as_deref())?;
        let summaries = store.live_summary(d)?;
        print_summaries(&format!("Live summary {}", d), &summaries);
    }
    Ok(())
}
