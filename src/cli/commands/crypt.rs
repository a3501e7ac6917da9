use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::logic::Attendance;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Crypt {
        enable,
        disable,
        verify,
    } = cmd
    else {
        return Ok(());
    };

    let pass = cli
        .passphrase
        .as_deref()
        .ok_or_else(|| AppError::Config("crypt commands require --passphrase".into()))?;

    if *verify {
        let digest = cfg
            .passphrase_digest
            .as_deref()
            .ok_or_else(|| AppError::Config("no passphrase digest stored".into()))?;
        if Attendance::verify_passphrase(pass, digest) {
            success("Passphrase verified.");
        } else {
            return Err(AppError::BadPassphrase);
        }
        return Ok(());
    }

    if *enable {
        if cfg.encryption_enabled {
            warning("Encryption is already enabled.");
            return Ok(());
        }

        let mut store = Attendance::open(&cfg.database)?;
        let digest = store.enable_encryption(pass)?;

        let mut updated = Config::load();
        updated.database = cfg.database.clone();
        updated.encryption_enabled = true;
        updated.passphrase_digest = Some(digest);
        if !cli.test {
            updated.save()?;
        }

        success("Field encryption enabled; sensitive columns rewritten.");
        return Ok(());
    }

    if *disable {
        if !cfg.encryption_enabled {
            warning("Encryption is not enabled.");
            return Ok(());
        }

        let digest = cfg
            .passphrase_digest
            .as_deref()
            .ok_or_else(|| AppError::Config("no passphrase digest stored".into()))?;
        if !Attendance::verify_passphrase(pass, digest) {
            return Err(AppError::BadPassphrase);
        }

        let mut store = Attendance::open(&cfg.database)?;
        store.disable_encryption(pass)?;

        let mut updated = Config::load();
        updated.database = cfg.database.clone();
        updated.encryption_enabled = false;
        updated.passphrase_digest = None;
        if !cli.test {
            updated.save()?;
        }

        success("Field encryption disabled; columns rewritten to plaintext.");
        return Ok(());
    }

    warning("Nothing to do: pass --enable, --disable, or --verify.");
    Ok(())
}
