use crate::utils::money::non_negative;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlaceId = Uuid;

/// Daily pay for one worker and one labourer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rates {
    #[serde(default)]
    pub worker: f64,
    #[serde(default)]
    pub labourer: f64,
}

impl Rates {
    /// Build a rate pair, clamping each side to a finite value >= 0.
    pub fn new(worker: f64, labourer: f64) -> Self {
        Self {
            worker: non_negative(worker),
            labourer: non_negative(labourer),
        }
    }
}

/// A construction site being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    #[serde(default)]
    pub worker_rate: f64,
    #[serde(default)]
    pub labourer_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn new(name: &str, rates: Rates) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            worker_rate: rates.worker,
            labourer_rate: rates.labourer,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current rates, sanitised (stored values may come from hand-edited files).
    pub fn rates(&self) -> Rates {
        Rates::new(self.worker_rate, self.labourer_rate)
    }

    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

/// First 8 characters of a uuid, used in tables and prompts.
pub fn short_id(id: &Uuid) -> String {
    let s = id.to_string();
    s[..8].to_string()
}
