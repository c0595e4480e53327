use super::CommandLedger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::places::resolve_place;
use crate::core::rates::{coerce_rate, set_rates};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::money::format_amount;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Rates {
        site,
        worker,
        labourer,
    } = cmd
    {
        let opened = CommandLedger::open(cfg)?;
        let ledger = &opened.ledger;
        let place = resolve_place(ledger, site)?;

        if worker.is_none() && labourer.is_none() {
            info(format!(
                "'{}': worker {} / labourer {} (policy: {})",
                place.name,
                format_amount(place.worker_rate, &cfg.currency),
                format_amount(place.labourer_rate, &cfg.currency),
                ledger.policy().as_str()
            ));
            return opened.finish();
        }

        let worker_rate = match worker {
            Some(raw) => coerce_rate(raw),
            None => place.worker_rate,
        };
        let labourer_rate = match labourer {
            Some(raw) => coerce_rate(raw),
            None => place.labourer_rate,
        };

        for raw in [worker, labourer].into_iter().flatten() {
            if coerce_rate(raw) == 0.0 && raw.trim().parse::<f64>() != Ok(0.0) {
                warning(format!("'{}' is not a valid rate, using 0", raw));
            }
        }

        let updated = set_rates(ledger, &place.id, worker_rate, labourer_rate)?;
        success(format!(
            "Rates for '{}': worker {} / labourer {}",
            updated.name,
            format_amount(updated.worker_rate, &cfg.currency),
            format_amount(updated.labourer_rate, &cfg.currency),
        ));

        opened.finish()?;
    }

    Ok(())
}
