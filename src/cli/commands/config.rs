use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd {
        if *print_config {
            header("Configuration");
            let yaml = serde_yaml::to_string(cfg).map_err(|_| AppError::ConfigLoad)?;
            println!("{}", yaml);
        }
    }
    Ok(())
}
