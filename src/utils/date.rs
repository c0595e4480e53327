//! Date arguments and period expressions.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `--date` value: `YYYY-MM-DD`, `today` or `yesterday`.
pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => Ok(today()),
        "yesterday" => Ok(today() - Duration::days(1)),
        _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(format!("'{}' (expected YYYY-MM-DD)", s))),
    }
}

/// Same as [`parse_date_arg`] but without failing: `None` on bad input.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_date_arg(s).ok()
}

/// First and last day of the current month.
pub fn current_month() -> (NaiveDate, NaiveDate) {
    let t = today();
    // today() is always a real date, so both ends exist.
    let first = t.with_day(1).unwrap_or(t);
    let last = month_last_day(t.year(), t.month())
        .and_then(|d| t.with_day(d))
        .unwrap_or(t);
    (first, last)
}

fn invalid(p: &str, why: &str) -> AppError {
    AppError::InvalidPeriod(format!("'{}': {}", p, why))
}

fn year_bounds(p: &str, y: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let y: i32 = y.parse().map_err(|_| invalid(p, "invalid year"))?;
    let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(p, "invalid year"))?;
    let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(p, "invalid year"))?;
    Ok((d1, d2))
}

fn month_bounds(p: &str, ym: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let (y, m) = ym.split_once('-').ok_or_else(|| invalid(p, "expected YYYY-MM"))?;
    let y: i32 = y.parse().map_err(|_| invalid(p, "invalid year"))?;
    let m: u32 = m.parse().map_err(|_| invalid(p, "invalid month"))?;
    let last = month_last_day(y, m).ok_or_else(|| invalid(p, "invalid month"))?;

    let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| invalid(p, "invalid month"))?;
    let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| invalid(p, "invalid month"))?;
    Ok((d1, d2))
}

fn day_bounds(p: &str, d: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let d = NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| invalid(p, "invalid date"))?;
    Ok((d, d))
}

fn bounds_of(p: &str, part: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match part.len() {
        4 => year_bounds(p, part),
        7 => month_bounds(p, part),
        10 => day_bounds(p, part),
        _ => Err(invalid(p, "use YYYY, YYYY-MM, YYYY-MM-DD or from:to")),
    }
}

/// Parse a period into an inclusive date window.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any two of the above with the same shape, joined by `:`
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    if let Some((start_raw, end_raw)) = p.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(invalid(p, "start and end must have the same format"));
        }

        let (from, _) = bounds_of(p, start)?;
        let (_, to) = bounds_of(p, end)?;
        if from > to {
            return Err(invalid(p, "start is after end"));
        }
        Ok((from, to))
    } else {
        bounds_of(p, p)
    }
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}
