use super::CommandLedger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{daily_total, total_between};
use crate::core::places::resolve_place;
use crate::core::rates::RateLookup;
use crate::errors::AppResult;
use crate::models::DailyRecord;
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_optional;
use crate::utils::date::{current_month, parse_period};
use crate::utils::formatting::{bold, separator, visible_len};
use crate::utils::money::format_amount;
use crate::utils::table::{Column, Table};

/// One row per record: date, counts, other costs, daily total, notes.
pub(crate) fn record_table(records: &[DailyRecord], rates: &dyn RateLookup) -> Table {
    let mut table = Table::new(vec![
        Column::left("Date"),
        Column::left("Day"),
        Column::right("Workers"),
        Column::right("Labourers"),
        Column::right("Other"),
        Column::right("Total"),
        Column::left("Notes"),
    ]);

    for r in records {
        let total = daily_total(r, rates.rates_for(r));
        table.add_row(vec![
            r.date_str(),
            r.date.format("%a").to_string(),
            colorize_optional(&r.workers.to_string()),
            colorize_optional(&r.labourers.to_string()),
            format!("{:.2}", r.other_costs()),
            format!("{:.2}", total),
            r.notes.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { site, period } = cmd {
        let (from, to) = match period {
            Some(p) => parse_period(p)?,
            None => current_month(),
        };

        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;
        let rates = ledger.rates_for(&place);

        let records: Vec<DailyRecord> = ledger
            .records(&place.id)
            .into_iter()
            .filter(|r| r.date >= from && r.date <= to)
            .collect();

        header(format!("{} · {} → {}", place.name, from, to));

        if records.is_empty() {
            info("No records for this period.");
            return opened.finish();
        }

        let table = record_table(&records, &rates);
        let rendered = table.render();
        print!("{}", rendered);

        let width = rendered.lines().map(visible_len).max().unwrap_or(40);
        println!("{}", separator(&cfg.separator_char, width));
        println!(
            "{} {}",
            bold("Period total:"),
            format_amount(total_between(&records, &rates, from, to), &cfg.currency)
        );

        opened.finish()?;
    }

    Ok(())
}
