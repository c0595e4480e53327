use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::store::Backend;
use crate::ui::messages::warning;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        if cfg.backend != Backend::Sqlite {
            warning(format!(
                "The audit log is kept by the sqlite backend only (current: {}).",
                cfg.backend
            ));
            return Ok(());
        }
        if !Path::new(&cfg.database).exists() {
            warning(format!("Database not found: {}", cfg.database));
            return Ok(());
        }

        let mut pool = DbPool::new(&cfg.database)?;
        LogLogic::print_log(&mut pool)?;
    }

    Ok(())
}
