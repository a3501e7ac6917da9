use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::header;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print } = cmd {
        if *print {
            let pool = DbPool::new(&cfg.database)?;
            header("Log");
            for (date, operation, message) in load_log(&pool.conn)? {
                println!("{}  {:<18} {}", date, operation, message);
            }
        }
    }
    Ok(())
}
