use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::logic::Attendance;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Create the configuration file and an initialized database.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    // opening runs the migrations and creates the schema
    let _store = Attendance::open(&cfg.database)?;

    success(format!("Database initialized at {}", cfg.database));
    if !cli.test {
        success(format!(
            "Configuration written to {}",
            Config::config_file().display()
        ));
    }
    Ok(())
}
