use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};

use super::open_store;

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Present = cmd {
        let store = open_store(cfg, cli.passphrase.as_deref())?;
        let present = store.currently_present()?;

        if present.is_empty() {
            info("Nobody is currently present.");
            return Ok(());
        }

        header("Currently present");
        for (identity, since) in present {
            println!(
                "{}  {:<24} since {}",
                identity.id,
                identity.display_name,
                since.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}
