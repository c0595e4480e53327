use super::CommandLedger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::daily_total;
use crate::core::places::resolve_place;
use crate::core::rates::RateLookup;
use crate::core::reconcile::{clean_costs, save_record};
use crate::errors::{AppError, AppResult};
use crate::models::{AdditionalCost, Attendance, DailyRecord};
use crate::ui::messages::{info, success};
use crate::utils::date::parse_date_arg;
use crate::utils::money::format_amount;

/// Parse a `--cost` value of the form `description=amount`.
///
/// The split is on the last `=`, so descriptions may contain `=` themselves.
pub fn parse_cost(raw: &str) -> AppResult<AdditionalCost> {
    let (desc, amount) = raw
        .rsplit_once('=')
        .ok_or_else(|| AppError::InvalidCost(format!("'{}' (expected DESC=AMOUNT)", raw)))?;

    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidCost(format!("'{}': amount is not a number", raw)))?;

    Ok(AdditionalCost::new(desc.trim(), amount))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        site,
        date,
        workers,
        labourers,
        costs,
        notes,
    } = cmd
    {
        // Validate everything before anything is queued.
        let day = parse_date_arg(date)?;
        let parsed: Vec<AdditionalCost> = costs
            .iter()
            .map(|c| parse_cost(c))
            .collect::<AppResult<_>>()?;
        let kept = clean_costs(parsed.clone()).len();
        if kept < parsed.len() {
            info(format!(
                "Ignored {} cost item(s) with no description or a zero amount.",
                parsed.len() - kept
            ));
        }

        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;

        let outcome = save_record(
            ledger,
            &place.id,
            day,
            Attendance::new(*workers, *labourers),
            parsed,
            notes.clone(),
        )?;

        let verb = if outcome.created { "created" } else { "updated" };
        success(format!(
            "Record {} for '{}' on {} (id {})",
            verb,
            place.name,
            day.format("%Y-%m-%d"),
            crate::models::place::short_id(&outcome.id)
        ));

        if let Some(record) = ledger.record_on(&place.id, day) {
            print_breakdown(&record, &ledger.rates_for(&place), &cfg.currency);
        }

        opened.finish()?;
    }

    Ok(())
}

fn print_breakdown(record: &DailyRecord, rates: &dyn RateLookup, currency: &str) {
    let applied = rates.rates_for(record);
    println!(
        "   workers   {:>4} x {:>10.2}",
        record.workers, applied.worker
    );
    println!(
        "   labourers {:>4} x {:>10.2}",
        record.labourers, applied.labourer
    );
    for c in &record.additional_costs {
        println!("   + {:<20} {:>10.2}", c.description, c.amount);
    }
    println!(
        "   Daily total: {}",
        format_amount(daily_total(record, applied), currency)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cost_pairs() {
        assert_eq!(
            parse_cost("Cement bags=500").unwrap(),
            AdditionalCost::new("Cement bags", 500.0)
        );
        assert_eq!(
            parse_cost("a=b=12.5").unwrap(),
            AdditionalCost::new("a=b", 12.5)
        );
    }

    #[test]
    fn rejects_malformed_costs() {
        assert!(matches!(parse_cost("Cement"), Err(AppError::InvalidCost(_))));
        assert!(matches!(parse_cost("Cement=lots"), Err(AppError::InvalidCost(_))));
    }
}
