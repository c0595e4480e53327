use super::{CommandLedger, ask_confirmation};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::places::clear;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear { yes } = cmd {
        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let sites = ledger.places().len();

        let prompt = format!(
            "Delete ALL {} site(s) and their records for user '{}'? This action is irreversible.",
            sites,
            ledger.session()
        );
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return opened.finish();
        }

        clear(ledger);
        success(format!("All data of '{}' has been deleted.", ledger.session()));
        opened.finish()?;
    }

    Ok(())
}
