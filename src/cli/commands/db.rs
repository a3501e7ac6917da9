use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            init_db(&pool.conn)?;
            success("Migrations up to date.");
        }

        if *check {
            let result: String =
                pool.conn
                    .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
            if result == "ok" {
                success("Database integrity: ok");
            } else {
                return Err(AppError::Migration(format!("integrity check: {}", result)));
            }
        }

        if *info {
            header("Database");
            println!("path: {}", cfg.database);
            let identities: i64 =
                pool.conn
                    .query_row("SELECT COUNT(*) FROM identities", [], |row| row.get(0))?;
            let events: i64 =
                pool.conn
                    .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            println!("identities: {}", identities);
            println!("events: {}", events);
        }
    }
    Ok(())
}
