use super::CommandLedger;
use super::list::record_table;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{week_bounds, week_key, weekly_total};
use crate::core::places::resolve_place;
use crate::errors::AppResult;
use crate::models::DailyRecord;
use crate::ui::messages::{header, info};
use crate::utils::date::parse_date_arg;
use crate::utils::formatting::bold;
use crate::utils::money::format_amount;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Week { site, date } = cmd {
        let day = parse_date_arg(date)?;
        let key = week_key(day);
        let (monday, sunday) = week_bounds(key);

        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;
        let rates = ledger.rates_for(&place);
        let records = ledger.records(&place.id);

        header(format!("{} · {} ({})", place.name, key.label(), key));

        let mut in_week: Vec<DailyRecord> = records
            .iter()
            .filter(|r| r.date >= monday && r.date <= sunday)
            .cloned()
            .collect();
        in_week.sort_by(|a, b| b.date.cmp(&a.date));

        if in_week.is_empty() {
            info("No records in this week.");
        } else {
            print!("{}", record_table(&in_week, &rates).render());
        }

        println!(
            "{} {}",
            bold("Week total:"),
            format_amount(weekly_total(&records, &rates, key), &cfg.currency)
        );

        opened.finish()?;
    }

    Ok(())
}
