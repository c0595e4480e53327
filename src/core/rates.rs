//! Rate configuration: which daily rates apply to a record, and overwriting
//! a site's current rates.

use crate::core::ledger::Ledger;
use crate::core::writer::WriteOp;
use crate::errors::{AppError, AppResult};
use crate::models::place::short_id;
use crate::models::{DailyRecord, Place, PlaceId, Rates};
use crate::utils::money::coerce_amount;
use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Where the rates used to price a historical record come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RatePolicy {
    /// The site's current rates, applied retroactively to every record.
    #[default]
    Live,
    /// The rates captured on the record when it was saved.
    Snapshot,
}

impl RatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatePolicy::Live => "live",
            RatePolicy::Snapshot => "snapshot",
        }
    }
}

/// Anything that can price a record.
pub trait RateLookup {
    fn rates_for(&self, record: &DailyRecord) -> Rates;
}

impl RateLookup for Rates {
    fn rates_for(&self, _record: &DailyRecord) -> Rates {
        *self
    }
}

impl<F> RateLookup for F
where
    F: Fn(&DailyRecord) -> Rates,
{
    fn rates_for(&self, record: &DailyRecord) -> Rates {
        self(record)
    }
}

/// A site's current rates combined with the configured policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyRates {
    pub current: Rates,
    pub policy: RatePolicy,
}

impl PolicyRates {
    pub fn new(place: &Place, policy: RatePolicy) -> Self {
        Self {
            current: place.rates(),
            policy,
        }
    }
}

impl RateLookup for PolicyRates {
    fn rates_for(&self, record: &DailyRecord) -> Rates {
        match self.policy {
            RatePolicy::Live => self.current,
            RatePolicy::Snapshot => record
                .rates
                .map(|r| Rates::new(r.worker, r.labourer))
                .unwrap_or(self.current),
        }
    }
}

/// Turn free-form input into a rate. Anything unusable becomes 0.
pub fn coerce_rate(input: &str) -> f64 {
    coerce_amount(input)
}

/// Overwrite a site's rates. No history is kept; under the live policy every
/// existing record is re-priced with the new values.
pub fn set_rates(
    ledger: &Ledger,
    place_id: &PlaceId,
    worker_rate: f64,
    labourer_rate: f64,
) -> AppResult<Place> {
    let mut place = ledger
        .place(place_id)
        .ok_or_else(|| AppError::PlaceNotFound(short_id(place_id)))?;

    let rates = Rates::new(worker_rate, labourer_rate);
    place.worker_rate = rates.worker;
    place.labourer_rate = rates.labourer;
    place.updated_at = Utc::now();

    ledger.submit(WriteOp::PutPlace(place.clone()));
    Ok(place)
}
