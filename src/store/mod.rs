//! Pluggable persistence for sites and daily records.
//!
//! Every backend implements [`Store`]: keyed get/put/delete plus a live
//! subscription. The ledger and the reconciliation logic only ever see
//! `Arc<dyn Store>` and never know which backend is active.

pub mod feed;
pub mod json;
pub mod memory;
pub mod sqlite;

pub use feed::{Feed, Subscription};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::AppResult;
use crate::models::{DailyRecord, Place, PlaceId, RecordId};
use crate::session::Session;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What changed in a store. Published after the write is durable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StoreChange {
    PlaceSaved {
        user: String,
        place_id: PlaceId,
    },
    PlaceDeleted {
        user: String,
        place_id: PlaceId,
    },
    RecordSaved {
        user: String,
        place_id: PlaceId,
        date: NaiveDate,
    },
    RecordDeleted {
        user: String,
        place_id: PlaceId,
        record_id: RecordId,
    },
    Cleared {
        user: String,
    },
}

impl StoreChange {
    pub fn user(&self) -> &str {
        match self {
            StoreChange::PlaceSaved { user, .. }
            | StoreChange::PlaceDeleted { user, .. }
            | StoreChange::RecordSaved { user, .. }
            | StoreChange::RecordDeleted { user, .. }
            | StoreChange::Cleared { user } => user,
        }
    }

    /// The site affected, if the change is scoped to one.
    pub fn place_id(&self) -> Option<PlaceId> {
        match self {
            StoreChange::PlaceSaved { place_id, .. }
            | StoreChange::PlaceDeleted { place_id, .. }
            | StoreChange::RecordSaved { place_id, .. }
            | StoreChange::RecordDeleted { place_id, .. } => Some(*place_id),
            StoreChange::Cleared { .. } => None,
        }
    }
}

pub trait Store: Send + Sync {
    /// Short backend name for logs and `db --info`.
    fn backend(&self) -> Backend;

    fn list_places(&self, session: &Session) -> AppResult<Vec<Place>>;
    fn get_place(&self, session: &Session, id: &PlaceId) -> AppResult<Option<Place>>;
    /// Insert or overwrite by place id.
    fn put_place(&self, session: &Session, place: &Place) -> AppResult<()>;
    /// Remove the place and every record it owns. Returns false if absent.
    fn delete_place(&self, session: &Session, id: &PlaceId) -> AppResult<bool>;

    /// Records of one place, oldest date first.
    fn list_records(&self, session: &Session, place: &PlaceId) -> AppResult<Vec<DailyRecord>>;
    fn get_record(
        &self,
        session: &Session,
        place: &PlaceId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyRecord>>;
    /// Upsert keyed by `(place, date)`. If a record already exists for that
    /// date its id is kept and every other field is replaced.
    fn put_record(&self, session: &Session, record: &DailyRecord) -> AppResult<()>;
    fn delete_record(
        &self,
        session: &Session,
        place: &PlaceId,
        record_id: &RecordId,
    ) -> AppResult<bool>;

    /// Drop every place and record of the session's user.
    fn clear(&self, session: &Session) -> AppResult<()>;

    fn subscribe(&self, listener: Box<dyn Fn(&StoreChange) + Send + Sync>) -> Subscription;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Json,
    Memory,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Json => "json",
            Backend::Memory => "memory",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open the configured backend. `path` is ignored for the memory backend.
pub fn open(backend: Backend, path: &str) -> AppResult<Arc<dyn Store>> {
    tracing::debug!(backend = %backend, path, "opening store");
    let store: Arc<dyn Store> = match backend {
        Backend::Sqlite => Arc::new(SqliteStore::open(path)?),
        Backend::Json => Arc::new(JsonStore::open(path)?),
        Backend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

/// One user's data in the document-shaped backends (memory and JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UserData {
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub records: Vec<DailyRecord>,
}

impl UserData {
    pub fn place(&self, id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|p| p.id == *id)
    }

    pub fn upsert_place(&mut self, place: &Place) {
        match self.places.iter_mut().find(|p| p.id == place.id) {
            Some(existing) => *existing = place.clone(),
            None => self.places.push(place.clone()),
        }
    }

    pub fn remove_place(&mut self, id: &PlaceId) -> bool {
        let before = self.places.len();
        self.places.retain(|p| p.id != *id);
        self.records.retain(|r| r.place_id != *id);
        self.places.len() != before
    }

    pub fn records_of(&self, place: &PlaceId) -> Vec<DailyRecord> {
        let mut out: Vec<DailyRecord> = self
            .records
            .iter()
            .filter(|r| r.place_id == *place)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.date);
        out
    }

    pub fn record_on(&self, place: &PlaceId, date: NaiveDate) -> Option<&DailyRecord> {
        self.records
            .iter()
            .find(|r| r.place_id == *place && r.date == date)
    }

    pub fn upsert_record(&mut self, record: &DailyRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.place_id == record.place_id && r.date == record.date)
        {
            Some(existing) => {
                let id = existing.id;
                let created_at = existing.created_at;
                *existing = record.clone();
                existing.id = id;
                existing.created_at = created_at;
            }
            None => self.records.push(record.clone()),
        }
    }

    pub fn remove_record(&mut self, place: &PlaceId, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records
            .retain(|r| !(r.place_id == *place && r.id == *id));
        self.records.len() != before
    }
}
