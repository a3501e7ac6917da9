use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;

use super::open_store;

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { id } = cmd {
        let store = open_store(cfg, cli.passphrase.as_deref())?;
        let status = store.current_status(id)?;
        info(format!("{}: {}", id, status.as_str()));
    }
    Ok(())
}
