//! lablogger library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Identity { .. } => cli::commands::identity::handle(cli, &cli.command, cfg),
        Commands::Checkin { .. } => cli::commands::checkin::handle(cli, &cli.command, cfg),
        Commands::Checkout { .. } => cli::commands::checkout::handle(cli, &cli.command, cfg),
        Commands::Status { .. } => cli::commands::status::handle(cli, &cli.command, cfg),
        Commands::Present => cli::commands::present::handle(cli, &cli.command, cfg),
        Commands::Summary { .. } => cli::commands::summary::handle(cli, &cli.command, cfg),
        Commands::Live { .. } => cli::commands::live::handle(cli, &cli.command, cfg),
        Commands::Events { .. } => cli::commands::events::handle(cli, &cli.command, cfg),
        Commands::Crypt { .. } => cli::commands::crypt::handle(cli, &cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once
    let mut cfg = Config::load();

    // apply a database override from the command line, if any
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
