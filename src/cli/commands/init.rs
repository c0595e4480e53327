use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::store::{self, Backend};
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the store file for the selected backend
///  - all pending DB migrations (sqlite)
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    println!("⚙️  Initializing sitebook…");

    if cli.test {
        warning("Test mode: configuration file left untouched.");
    } else {
        let path = cfg.save()?;
        println!("📄 Config file : {}", path.display());
    }

    match cfg.backend {
        Backend::Sqlite => {
            if let Some(parent) = std::path::Path::new(&cfg.database).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let pool = DbPool::new(&cfg.database)?;
            let applied = init_db(&pool.conn)?;
            for version in &applied {
                println!("  • migration {}", version);
            }

            if let Err(e) = ttlog(
                &pool.conn,
                "init",
                "",
                &format!("Database initialized at {}", cfg.database),
            ) {
                warning(format!("Failed to write internal log: {}", e));
            }
            println!("🗄️  Database    : {}", cfg.database);
        }
        Backend::Json => {
            store::open(Backend::Json, &cfg.json_file)?;
            println!("🗄️  JSON store  : {}", cfg.json_file);
        }
        Backend::Memory => {
            warning("Memory backend selected: data lives only for one command.");
        }
    }

    println!("👤 User        : {}", cfg.user);
    success("sitebook initialization completed!");
    Ok(())
}
