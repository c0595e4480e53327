//! ISO week keys and the derived weekly buckets used by reports.

use super::record::DailyRecord;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// ISO-8601 week: Monday through Sunday, numbered within its ISO year.
///
/// Ordering follows the calendar, so sorting keys sorts weeks in time
/// (`2025-W09` < `2025-W10` < `2026-W01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn monday(&self) -> NaiveDate {
        // Keys are only ever built from real dates or validated in from_str.
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or(NaiveDate::MIN)
    }

    pub fn sunday(&self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Sun).unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday() && date <= self.sunday()
    }

    /// "Week of Sep 1 - Sep 7, 2025"
    pub fn label(&self) -> String {
        format!(
            "Week of {} - {}",
            self.monday().format("%b %-d"),
            self.sunday().format("%b %-d, %Y")
        )
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, week) = s
            .trim()
            .split_once("-W")
            .ok_or_else(|| format!("Invalid week '{}', expected YYYY-Www", s))?;

        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid week year in '{}'", s))?;
        let week: u32 = week
            .parse()
            .map_err(|_| format!("Invalid week number in '{}'", s))?;

        if NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none() {
            return Err(format!("Week {} does not exist in {}", week, year));
        }

        Ok(Self { year, week })
    }
}

/// Records of one ISO week with their summed daily totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    pub key: WeekKey,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Newest date first.
    pub records: Vec<DailyRecord>,
    pub total: f64,
}

impl WeeklyBucket {
    pub fn new(key: WeekKey) -> Self {
        Self {
            key,
            label: key.label(),
            start: key.monday(),
            end: key.sunday(),
            records: Vec::new(),
            total: 0.0,
        }
    }
}
