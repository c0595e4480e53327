use super::{CommandLedger, ask_confirmation};
use crate::cli::parser::{Commands, SiteAction};
use crate::config::Config;
use crate::core::aggregate::{week_key, weekly_total};
use crate::core::places::{add_place, delete_place, rename_place, resolve_place};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, color_for_amount};
use crate::utils::date::today;
use crate::utils::money::format_amount;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Site { action } = cmd else {
        return Ok(());
    };

    let opened = CommandLedger::open(cfg)?;
    let ledger = &opened.ledger;

    match action {
        SiteAction::Add {
            name,
            worker_rate,
            labourer_rate,
        } => {
            let place = add_place(ledger, name, *worker_rate, *labourer_rate)?;
            success(format!(
                "Site '{}' created (id {}), worker {} / labourer {}",
                place.name,
                place.short_id(),
                format_amount(place.worker_rate, &cfg.currency),
                format_amount(place.labourer_rate, &cfg.currency),
            ));
        }

        SiteAction::List => {
            let places = ledger.places();
            if places.is_empty() {
                info("No sites yet. Create one with `sitebook site add <name>`.");
            } else {
                let this_week = week_key(today());
                let mut table = Table::new(vec![
                    Column::left("ID"),
                    Column::left("Site"),
                    Column::right("Worker"),
                    Column::right("Labourer"),
                    Column::right("Records"),
                    Column::right("This week"),
                ]);

                for place in &places {
                    let records = ledger.records(&place.id);
                    let week_total = weekly_total(&records, &ledger.rates_for(place), this_week);
                    table.add_row(vec![
                        format!("{GREY}{}{RESET}", place.short_id()),
                        place.name.clone(),
                        format!("{:.2}", place.worker_rate),
                        format!("{:.2}", place.labourer_rate),
                        records.len().to_string(),
                        format!(
                            "{}{}{RESET}",
                            color_for_amount(week_total),
                            format_amount(week_total, &cfg.currency)
                        ),
                    ]);
                }

                println!("🏗️  Sites ({}):\n", this_week.label());
                print!("{}", table.render());
            }
        }

        SiteAction::Rename { site, name } => {
            let place = resolve_place(ledger, site)?;
            let renamed = rename_place(ledger, &place.id, name)?;
            success(format!("Site '{}' renamed to '{}'", place.name, renamed.name));
        }

        SiteAction::Del { site, yes } => {
            let place = resolve_place(ledger, site)?;
            let count = ledger.records(&place.id).len();
            let prompt = format!(
                "Delete site '{}' and its {} record(s)? This action is irreversible.",
                place.name, count
            );

            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return opened.finish();
            }

            delete_place(ledger, &place.id)?;
            success(format!(
                "Site '{}' and {} record(s) deleted.",
                place.name, count
            ));
        }
    }

    opened.finish()
}
