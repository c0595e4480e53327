use crate::export::ExportFormat;
use crate::store::Backend;
use clap::{Parser, Subcommand};

/// Command-line interface definition for sitebook:
/// daily attendance and wage ledger for construction sites.
#[derive(Parser, Debug)]
#[command(
    name = "sitebook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track daily attendance and wage costs per construction site, with weekly totals",
    long_about = None
)]
pub struct Cli {
    /// Override the store file (SQLite database or JSON file)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Storage backend to use (overrides the config file)
    #[arg(global = true, long = "backend", value_enum)]
    pub backend: Option<Backend>,

    /// User whose ledger to work on (overrides the config file)
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the store and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the SQLite database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log (SQLite backend)
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage sites
    Site {
        #[command(subcommand)]
        action: SiteAction,
    },

    /// Show or overwrite the daily rates of a site
    Rates {
        /// Site name, id or id prefix
        site: String,

        #[arg(long = "worker", help = "Daily rate per worker")]
        worker: Option<String>,

        #[arg(long = "labourer", help = "Daily rate per labourer")]
        labourer: Option<String>,
    },

    /// Record (or overwrite) a day's attendance and costs for a site
    Add {
        /// Site name, id or id prefix
        site: String,

        #[arg(
            long = "date",
            default_value = "today",
            help = "Day of the record (YYYY-MM-DD, today, yesterday)"
        )]
        date: String,

        #[arg(long = "workers", default_value_t = 0)]
        workers: u32,

        #[arg(long = "labourers", default_value_t = 0)]
        labourers: u32,

        #[arg(
            long = "cost",
            value_name = "DESC=AMOUNT",
            help = "Additional cost, e.g. --cost \"Cement bags=500\" (repeatable)"
        )]
        costs: Vec<String>,

        #[arg(long = "notes")]
        notes: Option<String>,
    },

    /// Delete a daily record
    Del {
        /// Site name, id or id prefix
        site: String,

        /// Record date (YYYY-MM-DD) or record id prefix
        record: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List daily records with totals
    List {
        /// Site name, id or id prefix
        site: String,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or from:to (default: current month)"
        )]
        period: Option<String>,
    },

    /// Show the total for the ISO week containing a date
    Week {
        /// Site name, id or id prefix
        site: String,

        #[arg(long = "date", default_value = "today")]
        date: String,
    },

    /// Weekly totals, most recent week first
    History {
        /// Site name, id or id prefix
        site: String,
    },

    /// Export the weekly report of a site
    Export {
        /// Site name, id or id prefix
        site: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short, help = "Limit the export to a period")]
        period: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete every site and record of the current user
    Clear {
        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SiteAction {
    /// Create a site
    Add {
        name: String,

        #[arg(long = "worker-rate", default_value_t = 0.0, allow_negative_numbers = true)]
        worker_rate: f64,

        #[arg(long = "labourer-rate", default_value_t = 0.0, allow_negative_numbers = true)]
        labourer_rate: f64,
    },

    /// List sites with their rates and current-week total
    List,

    /// Rename a site
    Rename {
        /// Site name, id or id prefix
        site: String,
        name: String,
    },

    /// Delete a site and all of its records
    Del {
        /// Site name, id or id prefix
        site: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
