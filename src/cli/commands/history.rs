use super::CommandLedger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{grand_total, group_by_week};
use crate::core::places::resolve_place;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_amount};
use crate::utils::formatting::{bold, separator, visible_len};
use crate::utils::money::format_amount;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { site } = cmd {
        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;
        let rates = ledger.rates_for(&place);

        let buckets = group_by_week(&ledger.records(&place.id), &rates);

        header(format!("{} · weekly history", place.name));
        if buckets.is_empty() {
            info("No records yet.");
            return opened.finish();
        }

        let mut table = Table::new(vec![
            Column::left("Week"),
            Column::left("Period"),
            Column::right("Days"),
            Column::right("Total"),
        ]);
        for b in &buckets {
            table.add_row(vec![
                b.key.to_string(),
                b.label.clone(),
                b.records.len().to_string(),
                format!("{}{:.2}{RESET}", color_for_amount(b.total), b.total),
            ]);
        }

        let rendered = table.render();
        print!("{}", rendered);
        let width = rendered.lines().map(visible_len).max().unwrap_or(40);
        println!("{}", separator(&cfg.separator_char, width));
        println!(
            "{} {}",
            bold("Grand total:"),
            format_amount(grand_total(&buckets), &cfg.currency)
        );

        opened.finish()?;
    }

    Ok(())
}
