use super::place::{PlaceId, Rates};
use crate::utils::money::non_negative;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RecordId = Uuid;

/// Named ad-hoc expense attached to a daily record (e.g. "Cement bags").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdditionalCost {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
}

impl AdditionalCost {
    pub fn new(description: &str, amount: f64) -> Self {
        Self {
            description: description.to_string(),
            amount,
        }
    }

    /// A line item worth storing: a description and a positive amount.
    pub fn is_billable(&self) -> bool {
        !self.description.trim().is_empty() && self.amount.is_finite() && self.amount > 0.0
    }
}

/// Head counts for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attendance {
    pub workers: u32,
    pub labourers: u32,
}

impl Attendance {
    pub fn new(workers: u32, labourers: u32) -> Self {
        Self { workers, labourers }
    }
}

/// One day's attendance and costs for a site. At most one per (site, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: RecordId,
    pub place_id: PlaceId,
    pub date: NaiveDate, // "YYYY-MM-DD"
    #[serde(default)]
    pub workers: u32,
    #[serde(default)]
    pub labourers: u32,
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Rates in effect when the record was last saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<Rates>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl DailyRecord {
    pub fn new(place_id: PlaceId, date: NaiveDate, attendance: Attendance) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            place_id,
            date,
            workers: attendance.workers,
            labourers: attendance.labourers,
            additional_costs: Vec::new(),
            notes: None,
            rates: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of the additional cost amounts; malformed amounts count as 0.
    pub fn other_costs(&self) -> f64 {
        self.additional_costs
            .iter()
            .map(|c| non_negative(c.amount))
            .fold(0.0, |acc, amount| acc + amount)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn short_id(&self) -> String {
        super::place::short_id(&self.id)
    }
}
