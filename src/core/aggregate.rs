//! Daily and weekly wage totals.
//!
//! Every function here is pure: records and rates in, numbers or buckets
//! out. Bad inputs (negative or non-finite amounts) count as zero, so a
//! total is never negative and nothing here fails.

use crate::core::rates::RateLookup;
use crate::models::{DailyRecord, Rates, WeekKey, WeeklyBucket};
use crate::utils::money::non_negative;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// `workers * worker_rate + labourers * labourer_rate + other costs`.
pub fn daily_total(record: &DailyRecord, rates: Rates) -> f64 {
    let worker_rate = non_negative(rates.worker);
    let labourer_rate = non_negative(rates.labourer);

    let wages = record.workers as f64 * worker_rate + record.labourers as f64 * labourer_rate;
    non_negative(wages) + record.other_costs()
}

pub fn week_key(date: NaiveDate) -> WeekKey {
    WeekKey::of(date)
}

/// Monday and Sunday of the week, both inclusive.
pub fn week_bounds(key: WeekKey) -> (NaiveDate, NaiveDate) {
    (key.monday(), key.sunday())
}

pub fn weekly_total<R>(records: &[DailyRecord], rates: &R, week: WeekKey) -> f64
where
    R: RateLookup + ?Sized,
{
    let (from, to) = week_bounds(week);
    total_between(records, rates, from, to)
}

/// Sum of daily totals for records dated within `[from, to]`.
pub fn total_between<R>(records: &[DailyRecord], rates: &R, from: NaiveDate, to: NaiveDate) -> f64
where
    R: RateLookup + ?Sized,
{
    records
        .iter()
        .filter(|r| r.date >= from && r.date <= to)
        .map(|r| daily_total(r, rates.rates_for(r)))
        .fold(0.0, |acc, total| acc + total)
}

/// Bucket records by ISO week. Newest week first, and newest record first
/// inside each week.
pub fn group_by_week<R>(records: &[DailyRecord], rates: &R) -> Vec<WeeklyBucket>
where
    R: RateLookup + ?Sized,
{
    let mut buckets: BTreeMap<WeekKey, WeeklyBucket> = BTreeMap::new();

    for record in records {
        let key = week_key(record.date);
        let bucket = buckets.entry(key).or_insert_with(|| WeeklyBucket::new(key));
        bucket.total += daily_total(record, rates.rates_for(record));
        bucket.records.push(record.clone());
    }

    let mut out: Vec<WeeklyBucket> = buckets.into_values().rev().collect();
    for bucket in &mut out {
        bucket.records.sort_by(|a, b| b.date.cmp(&a.date));
    }
    out
}

pub fn grand_total(buckets: &[WeeklyBucket]) -> f64 {
    buckets.iter().fold(0.0, |acc, b| acc + b.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{PolicyRates, RatePolicy};
    use crate::models::{AdditionalCost, Attendance};
    use uuid::Uuid;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec(place: Uuid, date: &str, workers: u32, labourers: u32, costs: &[f64]) -> DailyRecord {
        let mut r = DailyRecord::new(place, d(date), Attendance::new(workers, labourers));
        r.additional_costs = costs
            .iter()
            .map(|a| AdditionalCost::new("item", *a))
            .collect();
        r
    }

    const RATES: Rates = Rates {
        worker: 1000.0,
        labourer: 600.0,
    };

    #[test]
    fn empty_inputs_total_positive_zero() {
        let week = week_key(d("2025-09-03"));
        let totals = [
            weekly_total(&[], &RATES, week),
            total_between(&[], &RATES, d("2025-09-01"), d("2025-09-30")),
            grand_total(&[]),
        ];
        for total in totals {
            assert_eq!(total, 0.0);
            assert!(total.is_sign_positive());
        }
        assert!(group_by_week(&[], &RATES).is_empty());

        let r = rec(Uuid::new_v4(), "2025-09-01", 0, 0, &[]);
        assert!(r.other_costs().is_sign_positive());
        assert!(daily_total(&r, RATES).is_sign_positive());
    }

    #[test]
    fn daily_total_matches_formula() {
        let r = rec(Uuid::new_v4(), "2025-09-01", 10, 15, &[500.0]);
        assert_eq!(daily_total(&r, RATES), 19500.0);
    }

    #[test]
    fn daily_total_treats_bad_inputs_as_zero() {
        let r = rec(Uuid::new_v4(), "2025-09-01", 2, 1, &[-50.0, f64::NAN, 25.0]);
        let rates = Rates {
            worker: f64::INFINITY,
            labourer: -3.0,
        };
        assert_eq!(daily_total(&r, rates), 25.0);
    }

    #[test]
    fn daily_total_handles_record_with_missing_fields() {
        let json = format!(
            r#"{{"id":"{}","place_id":"{}","date":"2025-09-02"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let r: DailyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(daily_total(&r, RATES), 0.0);
    }

    #[test]
    fn two_days_in_one_week_sum() {
        let place = Uuid::new_v4();
        let records = vec![
            rec(place, "2025-09-01", 10, 15, &[500.0]),
            rec(place, "2025-09-03", 12, 15, &[]),
        ];
        let total = weekly_total(&records, &RATES, week_key(d("2025-09-01")));
        assert_eq!(total, 19500.0 + 21000.0);
    }

    #[test]
    fn weekly_total_excludes_neighbouring_days() {
        let place = Uuid::new_v4();
        let records = vec![
            rec(place, "2025-08-31", 1, 0, &[]), // Sunday before
            rec(place, "2025-09-01", 1, 0, &[]), // Monday
            rec(place, "2025-09-07", 1, 0, &[]), // Sunday
            rec(place, "2025-09-08", 1, 0, &[]), // Monday after
        ];
        let total = weekly_total(&records, &RATES, week_key(d("2025-09-04")));
        assert_eq!(total, 2000.0);
    }

    #[test]
    fn deleting_a_record_only_changes_its_week() {
        let place = Uuid::new_v4();
        let mut records = vec![
            rec(place, "2025-09-01", 1, 0, &[]),
            rec(place, "2025-09-02", 2, 0, &[]),
            rec(place, "2025-09-09", 3, 0, &[]),
        ];
        let this_week = week_key(d("2025-09-01"));
        let next_week = week_key(d("2025-09-09"));
        assert_eq!(weekly_total(&records, &RATES, this_week), 3000.0);

        records.retain(|r| r.date != d("2025-09-02"));
        assert_eq!(weekly_total(&records, &RATES, this_week), 1000.0);
        assert_eq!(weekly_total(&records, &RATES, next_week), 3000.0);
    }

    #[test]
    fn groups_newest_week_first_and_newest_day_first() {
        let place = Uuid::new_v4();
        let records = vec![
            rec(place, "2025-08-26", 1, 0, &[]),
            rec(place, "2025-09-01", 1, 0, &[]),
            rec(place, "2025-09-05", 0, 1, &[]),
            rec(place, "2025-08-29", 0, 0, &[100.0]),
        ];
        let buckets = group_by_week(&records, &RATES);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key.to_string(), "2025-W36");
        assert_eq!(buckets[0].label, "Week of Sep 1 - Sep 7, 2025");
        assert_eq!(buckets[0].records[0].date, d("2025-09-05"));
        assert_eq!(buckets[0].total, 1600.0);

        assert_eq!(buckets[1].key.to_string(), "2025-W35");
        assert_eq!(buckets[1].records[0].date, d("2025-08-29"));
        assert_eq!(buckets[1].total, 1100.0);

        assert_eq!(grand_total(&buckets), 2700.0);
    }

    #[test]
    fn year_boundary_uses_iso_week() {
        let key = week_key(d("2024-12-30"));
        assert_eq!(key.to_string(), "2025-W01");
        assert_eq!(week_bounds(key), (d("2024-12-30"), d("2025-01-05")));
    }

    #[test]
    fn snapshot_policy_prices_with_saved_rates() {
        let place = Uuid::new_v4();
        let mut old = rec(place, "2025-09-01", 1, 1, &[]);
        old.rates = Some(Rates::new(500.0, 300.0));
        let records = vec![old];

        let live = PolicyRates {
            current: RATES,
            policy: RatePolicy::Live,
        };
        let snap = PolicyRates {
            current: RATES,
            policy: RatePolicy::Snapshot,
        };
        let week = week_key(d("2025-09-01"));
        assert_eq!(weekly_total(&records, &live, week), 1600.0);
        assert_eq!(weekly_total(&records, &snap, week), 800.0);
    }
}
