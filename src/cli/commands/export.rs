use super::CommandLedger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::places::resolve_place;
use crate::errors::AppResult;
use crate::export::{ExportLogic, build_report};
use crate::utils::date::parse_period;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        site,
        format,
        file,
        period,
        force,
    } = cmd
    {
        let window = period.as_deref().map(parse_period).transpose()?;

        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;

        let report = build_report(
            &place,
            &ledger.records(&place.id),
            &ledger.rates_for(&place),
            window,
        );
        ExportLogic::export(&report, *format, file, *force)?;

        opened.finish()?;
    }

    Ok(())
}
