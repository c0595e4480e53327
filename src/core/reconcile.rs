//! Create-or-overwrite rule for daily records.
//!
//! A site has at most one record per calendar date. Saving for a date that
//! already has a record replaces its contents in place (same id); otherwise
//! a new record is created.

use crate::core::ledger::Ledger;
use crate::core::writer::WriteOp;
use crate::errors::{AppError, AppResult};
use crate::models::place::short_id;
use crate::models::{AdditionalCost, Attendance, DailyRecord, PlaceId, RecordId};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub id: RecordId,
    /// False when an existing record for the date was overwritten.
    pub created: bool,
}

/// Drop line items with a blank description or a non-positive amount.
pub fn clean_costs(costs: Vec<AdditionalCost>) -> Vec<AdditionalCost> {
    costs
        .into_iter()
        .filter(AdditionalCost::is_billable)
        .map(|c| AdditionalCost::new(c.description.trim(), c.amount))
        .collect()
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

pub fn save_record(
    ledger: &Ledger,
    place_id: &PlaceId,
    date: NaiveDate,
    counts: Attendance,
    additional_costs: Vec<AdditionalCost>,
    notes: Option<String>,
) -> AppResult<SaveOutcome> {
    let place = ledger
        .place(place_id)
        .ok_or_else(|| AppError::PlaceNotFound(short_id(place_id)))?;

    let costs = clean_costs(additional_costs);
    let notes = clean_notes(notes);

    let (mut record, created) = match ledger.record_on(place_id, date) {
        Some(mut existing) => {
            existing.workers = counts.workers;
            existing.labourers = counts.labourers;
            existing.additional_costs = costs;
            existing.notes = notes;
            existing.updated_at = Utc::now();
            (existing, false)
        }
        None => {
            let mut fresh = DailyRecord::new(*place_id, date, counts);
            fresh.additional_costs = costs;
            fresh.notes = notes;
            (fresh, true)
        }
    };
    record.rates = Some(place.rates());

    let outcome = SaveOutcome {
        id: record.id,
        created,
    };
    tracing::debug!(
        place = %place.short_id(),
        date = %record.date_str(),
        created,
        "saving daily record"
    );
    ledger.submit(WriteOp::PutRecord(record));
    Ok(outcome)
}

/// Remove a record. Returns false (and does nothing) if it does not exist.
pub fn delete_record(ledger: &Ledger, place_id: &PlaceId, record_id: &RecordId) -> bool {
    if ledger.record(place_id, record_id).is_none() {
        return false;
    }
    ledger.submit(WriteOp::DeleteRecord {
        place_id: *place_id,
        record_id: *record_id,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_costs_drops_empty_items() {
        let cleaned = clean_costs(vec![
            AdditionalCost::new("Cement bags", 500.0),
            AdditionalCost::new("   ", 100.0),
            AdditionalCost::new("Sand", 0.0),
            AdditionalCost::new("Refund", -20.0),
            AdditionalCost::new("Broken", f64::NAN),
            AdditionalCost::new(" Tea ", 40.0),
        ]);
        assert_eq!(
            cleaned,
            vec![
                AdditionalCost::new("Cement bags", 500.0),
                AdditionalCost::new("Tea", 40.0),
            ]
        );
    }

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(clean_notes(Some("  ".into())), None);
        assert_eq!(clean_notes(Some(" rain ".into())), Some("rain".into()));
    }
}
