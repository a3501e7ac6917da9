use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::day_summary::DailySummary;
use crate::models::policy::ClosePolicy;
use crate::ui::messages::header;
use crate::utils::date;
use crate::utils::time::format_minutes;

use super::open_store;

fn build_policy(name: &str, hour: Option<u32>, cfg: &Config) -> AppResult<ClosePolicy> {
    let cutoff = hour.unwrap_or(cfg.cutoff_hour);
    match name {
        "none" => Ok(ClosePolicy::None),
        "cap" => Ok(ClosePolicy::CapAt { hour: cutoff }),
        "write" => Ok(ClosePolicy::WriteAt { hour: cutoff }),
        "hybrid" => Ok(ClosePolicy::Hybrid {
            cutoff_hour: cutoff,
            eod_hour: cfg.eod_hour,
            eod_minute: cfg.eod_minute,
            after_minutes: cfg.after_minutes,
        }),
        other => Err(AppError::Other(format!(
            "Unknown policy '{}': expected none, cap, write, or hybrid",
            other
        ))),
    }
}

pub fn print_summaries(title: &str, summaries: &[DailySummary]) {
    header(title);
    for s in summaries {
        if s.absent {
            println!("{:<24} absent", s.display_name);
            continue;
        }

        let mut flags = String::new();
        if s.autoclosed {
            flags.push_str(" [autoclosed]");
        }

        println!(
            "{:<24} {:>7}  {:>6.2}h  ({} session{}){}",
            s.display_name,
            format_minutes(s.total_minutes),
            s.total_hours,
            s.sessions.len(),
            if s.sessions.len() == 1 { "" } else { "s" },
            flags
        );

        for sess in &s.sessions {
            let out = match sess.out_at {
                Some(o) => o.format("%H:%M").to_string(),
                None => "--:--".to_string(),
            };
            let mark = if sess.synthetic_out {
                " (synthetic)"
            } else if !sess.closed {
                " (open)"
            } else {
                ""
            };
            println!(
                "    {} → {}{}",
                sess.in_at.format("%H:%M"),
                out,
                mark
            );
        }
    }
}

pub fn handle(cli: &Cli, cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary {
        date: date_arg,
        policy,
        hour,
        preview,
    } = cmd
    {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let policy = build_policy(policy, *hour, cfg)?;
        let store = open_store(cfg, cli.passphrase.as_deref())?;

        let summaries = if *preview || !policy.writes_back() {
            store.preview_daily_summary(d, policy)?
        } else {
            store.daily_summary_with_auto_close(d, policy)?
        };

        print_summaries(&format!("Summary {}", d), &summaries);
    }
    Ok(())
}
