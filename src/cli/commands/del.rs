use super::{CommandLedger, ask_confirmation};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::core::places::resolve_place;
use crate::core::reconcile::delete_record;
use crate::errors::{AppError, AppResult};
use crate::models::{DailyRecord, PlaceId};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_date_arg;

/// A record is named by its date or by a prefix of its id.
fn find_record(ledger: &Ledger, place: &PlaceId, key: &str) -> AppResult<Option<DailyRecord>> {
    if let Ok(day) = parse_date_arg(key) {
        return Ok(ledger.record_on(place, day));
    }

    let key = key.trim().to_lowercase();
    if key.len() < 4 {
        return Err(AppError::Validation(format!(
            "'{}' is neither a date nor a record id prefix (4+ characters)",
            key
        )));
    }

    let matches: Vec<DailyRecord> = ledger
        .records(place)
        .into_iter()
        .filter(|r| r.id.to_string().starts_with(&key))
        .collect();

    match matches.len() {
        0 | 1 => Ok(matches.into_iter().next()),
        n => Err(AppError::Validation(format!(
            "id prefix '{}' matches {} records",
            key, n
        ))),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { site, record, yes } = cmd {
        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;

        let Some(target) = find_record(ledger, &place.id, record)? else {
            warning(format!("No record '{}' found for site '{}'.", record, place.name));
            return opened.finish();
        };

        let prompt = format!(
            "Delete the record of {} for '{}'? This action is irreversible.",
            target.date_str(),
            place.name
        );
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return opened.finish();
        }

        if delete_record(ledger, &place.id, &target.id) {
            success(format!(
                "Record of {} for '{}' has been deleted.",
                target.date_str(),
                place.name
            ));
        } else {
            warning("Record was already gone.");
        }

        opened.finish()?;
    }

    Ok(())
}
