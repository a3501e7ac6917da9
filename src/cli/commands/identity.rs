use crate::cli::parser::{Cli, Commands, IdentityAction};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::identity::{IdentityMeta, Role};
use crate::ui::messages::{header, success};

use super::open_store;

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Identity { action } = cmd else {
        return Ok(());
    };

    let store = open_store(cfg, cli.passphrase.as_deref())?;

    match action {
        IdentityAction::Add {
            id,
            name,
            email,
            role,
            hours,
            days,
        } => {
            let role = Role::from_db_str(role)
                .ok_or_else(|| AppError::Other(format!("Invalid role: {}", role)))?;

            let identity = store.add_identity(
                id,
                name,
                email.as_deref(),
                IdentityMeta {
                    role,
                    expected_hours_week: *hours,
                    expected_days_week: *days,
                },
            )?;

            success(format!(
                "Roster entry saved: {} ({})",
                identity.display_name, identity.id
            ));
        }

        IdentityAction::Rm { id } => {
            store.remove_identity(id)?;
            success(format!("Identity {} removed from the active roster.", id));
        }

        IdentityAction::List { all } => {
            header("Roster");
            for identity in store.list_identities()? {
                if !*all && !identity.active {
                    continue;
                }
                let state = if identity.active { "active" } else { "inactive" };
                println!(
                    "{}  {:<24} {:<10} {}",
                    identity.id,
                    identity.display_name,
                    identity.role.to_db_str(),
                    state
                );
            }
        }
    }

    Ok(())
}
