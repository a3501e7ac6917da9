use clap::{Parser, Subcommand};

/// Command-line interface definition for lablogger
/// CLI application to track lab presence with SQLite
#[derive(Parser)]
#[command(
    name = "lablogger",
    version = env!("CARGO_PKG_VERSION"),
    about = "A presence ledger CLI: check-in/check-out events and daily attendance summaries over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Passphrase unlocking encrypted roster fields for this invocation
    #[arg(global = true, long = "passphrase")]
    pub passphrase: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the roster of authorized identities
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },

    /// Record a check-in for an identity
    Checkin {
        /// 8-digit identity id
        id: String,

        #[arg(long = "at", help = "Event time (HH:MM), default now")]
        at: Option<String>,

        #[arg(long = "date", help = "Event date (YYYY-MM-DD), default today")]
        date: Option<String>,
    },

    /// Record a check-out for an identity
    Checkout {
        /// 8-digit identity id
        id: String,

        #[arg(long = "at", help = "Event time (HH:MM), default now")]
        at: Option<String>,

        #[arg(long = "date", help = "Event date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(
            long = "pending",
            help = "Tag for a checkout whose exact time will be resolved later"
        )]
        pending: Option<String>,
    },

    /// Show the current presence status of an identity
    Status {
        /// 8-digit identity id
        id: String,
    },

    /// List identities currently present in the lab
    Present,

    /// Daily attendance summary for a date
    Summary {
        /// Date (YYYY-MM-DD), default today
        date: Option<String>,

        #[arg(
            long = "policy",
            help = "Auto-close policy for open sessions: none, cap, write, hybrid",
            default_value = "cap"
        )]
        policy: String,

        #[arg(long = "hour", help = "Cutoff hour for cap/write policies")]
        hour: Option<u32>,

        #[arg(
            long = "preview",
            help = "Estimate only: never write synthetic checkouts back"
        )]
        preview: bool,
    },

    /// Hours-so-far summary (open sessions closed virtually at now)
    Live {
        /// Date (YYYY-MM-DD), default today
        date: Option<String>,
    },

    /// List, delete, or resolve ledger events
    Events {
        #[arg(long = "id", help = "Only events of this identity")]
        id: Option<String>,

        #[arg(long = "date", help = "Only events of this day (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "from", help = "Range start (YYYY-MM-DD), inclusive")]
        from: Option<String>,

        #[arg(long = "to", help = "Range end (YYYY-MM-DD), inclusive")]
        to: Option<String>,

        #[arg(long = "del", help = "Delete the event with this id")]
        del: Option<i64>,

        #[arg(long = "resolve", help = "Resolve the pending checkout with this tag")]
        resolve: Option<String>,

        #[arg(
            long = "at",
            help = "Resolved time (HH:MM or YYYY-MM-DD HH:MM), used with --resolve"
        )]
        at: Option<String>,
    },

    /// Enable, disable, or verify at-rest field encryption
    Crypt {
        #[arg(long = "enable", help = "Encrypt roster and event name fields")]
        enable: bool,

        #[arg(long = "disable", help = "Decrypt fields back to plaintext")]
        disable: bool,

        #[arg(long = "verify", help = "Verify the passphrase against the stored digest")]
        verify: bool,
    },
}

#[derive(Subcommand)]
pub enum IdentityAction {
    /// Add or replace a roster entry (upserts replace all fields)
    Add {
        /// 8-digit identity id
        id: String,

        /// Display name
        name: String,

        #[arg(long = "email")]
        email: Option<String>,

        #[arg(
            long = "role",
            help = "volunteer, staff, student, or mentor",
            default_value = "volunteer"
        )]
        role: String,

        #[arg(long = "hours", help = "Expected hours per week", default_value_t = 0.0)]
        hours: f64,

        #[arg(long = "days", help = "Expected days per week", default_value_t = 0.0)]
        days: f64,
    },

    /// Remove an identity from the active roster (history is kept)
    Rm {
        /// 8-digit identity id
        id: String,
    },

    /// List the roster
    List {
        #[arg(long = "all", help = "Include deactivated identities")]
        all: bool,
    },
}
