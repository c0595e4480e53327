use crate::core::aggregate::{daily_total, grand_total, group_by_week};
use crate::core::rates::{PolicyRates, RateLookup};
use crate::models::{DailyRecord, Place};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// One exported daily record, flattened for CSV.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ExportRow {
    pub site: String,
    pub week: String,
    pub date: String,
    pub workers: u32,
    pub worker_rate: f64,
    pub labourers: u32,
    pub labourer_rate: f64,
    pub other_costs: f64,
    /// "Cement bags=500; Sand=200"
    pub cost_details: String,
    pub notes: String,
    pub daily_total: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WeekReport {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: f64,
    /// Newest date first.
    pub records: Vec<ExportRow>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WeeklyReport {
    pub site: String,
    pub site_id: String,
    pub worker_rate: f64,
    pub labourer_rate: f64,
    pub rate_policy: String,
    pub generated_at: String,
    pub weeks: Vec<WeekReport>,
    pub grand_total: f64,
}

impl WeeklyReport {
    /// All rows, newest week first.
    pub fn rows(&self) -> impl Iterator<Item = &ExportRow> {
        self.weeks.iter().flat_map(|w| w.records.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

fn to_row(place: &Place, week: &str, record: &DailyRecord, rates: &PolicyRates) -> ExportRow {
    let applied = rates.rates_for(record);
    ExportRow {
        site: place.name.clone(),
        week: week.to_string(),
        date: record.date_str(),
        workers: record.workers,
        worker_rate: applied.worker,
        labourers: record.labourers,
        labourer_rate: applied.labourer,
        other_costs: record.other_costs(),
        cost_details: record
            .additional_costs
            .iter()
            .map(|c| format!("{}={}", c.description, c.amount))
            .collect::<Vec<_>>()
            .join("; "),
        notes: record.notes.clone().unwrap_or_default(),
        daily_total: daily_total(record, applied),
    }
}

/// Build the weekly report for one site, optionally limited to a window.
pub fn build_report(
    place: &Place,
    records: &[DailyRecord],
    rates: &PolicyRates,
    window: Option<(NaiveDate, NaiveDate)>,
) -> WeeklyReport {
    let selected: Vec<DailyRecord> = match window {
        Some((from, to)) => records
            .iter()
            .filter(|r| r.date >= from && r.date <= to)
            .cloned()
            .collect(),
        None => records.to_vec(),
    };

    let buckets = group_by_week(&selected, rates);
    let weeks = buckets
        .iter()
        .map(|b| {
            let key = b.key.to_string();
            WeekReport {
                records: b
                    .records
                    .iter()
                    .map(|r| to_row(place, &key, r, rates))
                    .collect(),
                key,
                label: b.label.clone(),
                start: b.start,
                end: b.end,
                total: b.total,
            }
        })
        .collect();

    WeeklyReport {
        site: place.name.clone(),
        site_id: place.id.to_string(),
        worker_rate: rates.current.worker,
        labourer_rate: rates.current.labourer,
        rate_policy: rates.policy.as_str().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        weeks,
        grand_total: grand_total(&buckets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RatePolicy;
    use crate::models::{AdditionalCost, Attendance, Rates};

    #[test]
    fn report_groups_rows_by_week() {
        let place = Place::new("Block A", Rates::new(1000.0, 600.0));
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

        let mut r1 = DailyRecord::new(place.id, d("2025-09-01"), Attendance::new(10, 15));
        r1.additional_costs = vec![AdditionalCost::new("Cement bags", 500.0)];
        let r2 = DailyRecord::new(place.id, d("2025-09-09"), Attendance::new(1, 0));

        let rates = PolicyRates::new(&place, RatePolicy::Live);
        let report = build_report(&place, &[r1, r2], &rates, None);

        assert_eq!(report.weeks.len(), 2);
        assert_eq!(report.weeks[0].key, "2025-W37");
        assert_eq!(report.weeks[1].records[0].daily_total, 19500.0);
        assert_eq!(report.weeks[1].records[0].cost_details, "Cement bags=500");
        assert_eq!(report.grand_total, 20500.0);
        assert_eq!(report.rows().count(), 2);

        let only_first = build_report(
            &place,
            &[DailyRecord::new(place.id, d("2025-09-01"), Attendance::new(1, 1))],
            &rates,
            Some((d("2025-09-02"), d("2025-09-30"))),
        );
        assert!(only_first.is_empty());
    }
}
