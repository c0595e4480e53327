//! The ledger: one user's view of the store.
//!
//! Reads are served from an in-memory snapshot. Writes update the snapshot
//! right away and are queued for the store; when the store reports the
//! change back, the affected part of the snapshot is reloaded from it.

use crate::core::rates::{PolicyRates, RatePolicy};
use crate::core::writer::{ErrorBus, WriteFailure, WriteOp, WriteQueue};
use crate::errors::AppResult;
use crate::models::{DailyRecord, Place, PlaceId, RecordId};
use crate::session::Session;
use crate::store::{Backend, Feed, Store, StoreChange, Subscription};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

#[derive(Debug, Default)]
struct Snapshot {
    places: HashMap<PlaceId, Place>,
    records: HashMap<PlaceId, BTreeMap<NaiveDate, DailyRecord>>,
}

impl Snapshot {
    fn load(store: &dyn Store, session: &Session) -> AppResult<Self> {
        let mut snap = Snapshot::default();
        for place in store.list_places(session)? {
            snap.reload_records(store, session, &place.id)?;
            snap.places.insert(place.id, place);
        }
        Ok(snap)
    }

    fn reload_records(
        &mut self,
        store: &dyn Store,
        session: &Session,
        place: &PlaceId,
    ) -> AppResult<()> {
        let by_date = store
            .list_records(session, place)?
            .into_iter()
            .map(|r| (r.date, r))
            .collect();
        self.records.insert(*place, by_date);
        Ok(())
    }

    fn upsert_record(&mut self, record: &DailyRecord) {
        let by_date = self.records.entry(record.place_id).or_default();
        match by_date.get_mut(&record.date) {
            Some(existing) => {
                let id = existing.id;
                let created_at = existing.created_at;
                *existing = record.clone();
                existing.id = id;
                existing.created_at = created_at;
            }
            None => {
                by_date.insert(record.date, record.clone());
            }
        }
    }

    fn remove_place(&mut self, id: &PlaceId) {
        self.places.remove(id);
        self.records.remove(id);
    }

    fn remove_record(&mut self, place: &PlaceId, id: &RecordId) -> bool {
        match self.records.get_mut(place) {
            Some(by_date) => {
                let before = by_date.len();
                by_date.retain(|_, r| r.id != *id);
                by_date.len() != before
            }
            None => false,
        }
    }

    /// Optimistic application of a queued write.
    fn apply(&mut self, op: &WriteOp) {
        match op {
            WriteOp::PutPlace(p) => {
                self.places.insert(p.id, p.clone());
            }
            WriteOp::DeletePlace(id) => self.remove_place(id),
            WriteOp::PutRecord(r) => self.upsert_record(r),
            WriteOp::DeleteRecord {
                place_id,
                record_id,
            } => {
                self.remove_record(place_id, record_id);
            }
            WriteOp::Clear => {
                self.places.clear();
                self.records.clear();
            }
        }
    }

    /// Bring the part of the snapshot touched by `change` in line with the
    /// store.
    fn refresh(
        &mut self,
        store: &dyn Store,
        session: &Session,
        change: &StoreChange,
    ) -> AppResult<()> {
        match change {
            StoreChange::PlaceSaved { place_id, .. } => match store.get_place(session, place_id)? {
                Some(place) => {
                    self.places.insert(place.id, place);
                }
                None => self.remove_place(place_id),
            },
            StoreChange::PlaceDeleted { place_id, .. } => self.remove_place(place_id),
            StoreChange::RecordSaved { place_id, date, .. } => {
                let by_date = self.records.entry(*place_id).or_default();
                match store.get_record(session, place_id, *date)? {
                    Some(record) => {
                        by_date.insert(*date, record);
                    }
                    None => {
                        by_date.remove(date);
                    }
                }
            }
            StoreChange::RecordDeleted {
                place_id,
                record_id,
                ..
            } => {
                self.remove_record(place_id, record_id);
            }
            StoreChange::Cleared { .. } => {
                *self = Snapshot::load(store, session)?;
            }
        }
        Ok(())
    }
}

pub struct Ledger {
    session: Session,
    policy: RatePolicy,
    store: Arc<dyn Store>,
    state: Arc<RwLock<Snapshot>>,
    changes: Feed<StoreChange>,
    errors: ErrorBus,
    writer: WriteQueue,
    _store_sub: Subscription,
}

impl Ledger {
    /// Load the user's data and start listening to the store.
    pub fn open(store: Arc<dyn Store>, session: Session, policy: RatePolicy) -> AppResult<Self> {
        let snapshot = Snapshot::load(store.as_ref(), &session)?;
        let state = Arc::new(RwLock::new(snapshot));
        let changes: Feed<StoreChange> = Feed::new();
        let errors: ErrorBus = Feed::new();

        let store_sub = {
            let weak: Weak<dyn Store> = Arc::downgrade(&store);
            let state = Arc::clone(&state);
            let changes = changes.clone();
            let session = session.clone();

            store.subscribe(Box::new(move |change: &StoreChange| {
                if !session.owns(change.user()) {
                    return;
                }
                let Some(store) = weak.upgrade() else {
                    return;
                };

                {
                    let mut snap = state.write().unwrap_or_else(PoisonError::into_inner);
                    if let Err(e) = snap.refresh(store.as_ref(), &session, change) {
                        tracing::warn!(error = %e, ?change, "snapshot refresh failed");
                    }
                }
                changes.publish(change);
            }))
        };

        let writer = WriteQueue::start(Arc::clone(&store), errors.clone())?;

        tracing::debug!(user = %session, backend = %store.backend(), "ledger opened");

        Ok(Self {
            session,
            policy,
            store,
            state,
            changes,
            errors,
            writer,
            _store_sub: store_sub,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> RatePolicy {
        self.policy
    }

    pub fn backend(&self) -> Backend {
        self.store.backend()
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sites ordered by creation time, then name.
    pub fn places(&self) -> Vec<Place> {
        let mut places: Vec<Place> = self.read().places.values().cloned().collect();
        places.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        places
    }

    pub fn place(&self, id: &PlaceId) -> Option<Place> {
        self.read().places.get(id).cloned()
    }

    /// Records of one site, oldest date first.
    pub fn records(&self, place: &PlaceId) -> Vec<DailyRecord> {
        self.read()
            .records
            .get(place)
            .map(|by_date| by_date.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn record_on(&self, place: &PlaceId, date: NaiveDate) -> Option<DailyRecord> {
        self.read()
            .records
            .get(place)
            .and_then(|by_date| by_date.get(&date).cloned())
    }

    pub fn record(&self, place: &PlaceId, id: &RecordId) -> Option<DailyRecord> {
        self.read()
            .records
            .get(place)
            .and_then(|by_date| by_date.values().find(|r| r.id == *id).cloned())
    }

    /// Rate lookup for a site under the configured policy.
    pub fn rates_for(&self, place: &Place) -> PolicyRates {
        PolicyRates::new(place, self.policy)
    }

    /// Apply `op` to the snapshot and queue it for the store.
    pub(crate) fn submit(&self, op: WriteOp) {
        self.write().apply(&op);
        self.writer.submit(&self.session, op);
    }

    /// Be told about every change to this user's data once the store has it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StoreChange) + Send + Sync + 'static,
    {
        self.changes.subscribe(listener)
    }

    /// Be told about writes the store rejected.
    pub fn on_error<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&WriteFailure) + Send + Sync + 'static,
    {
        self.errors.subscribe(listener)
    }

    /// Wait for every queued write to reach the store.
    pub fn flush(&self) {
        self.writer.flush();
    }

    /// Throw the snapshot away and load it again from the store.
    pub fn reload(&self) -> AppResult<()> {
        let fresh = Snapshot::load(self.store.as_ref(), &self.session)?;
        *self.write() = fresh;
        Ok(())
    }
}
