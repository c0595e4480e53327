//! Volatile backend: everything lives in a map keyed by user id.

use super::{Backend, Feed, Store, StoreChange, Subscription, UserData};
use crate::errors::AppResult;
use crate::models::{DailyRecord, Place, PlaceId, RecordId};
use crate::session::Session;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserData>>,
    feed: Feed<StoreChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, session: &Session, f: impl FnOnce(&UserData) -> T) -> T {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        match users.get(session.user_id()) {
            Some(data) => f(data),
            None => f(&UserData::default()),
        }
    }

    fn write<T>(&self, session: &Session, f: impl FnOnce(&mut UserData) -> T) -> T {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        f(users.entry(session.user_id().to_string()).or_default())
    }
}

impl Store for MemoryStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    fn list_places(&self, session: &Session) -> AppResult<Vec<Place>> {
        Ok(self.read(session, |d| d.places.clone()))
    }

    fn get_place(&self, session: &Session, id: &PlaceId) -> AppResult<Option<Place>> {
        Ok(self.read(session, |d| d.place(id).cloned()))
    }

    fn put_place(&self, session: &Session, place: &Place) -> AppResult<()> {
        self.write(session, |d| d.upsert_place(place));
        self.feed.publish(&StoreChange::PlaceSaved {
            user: session.user_id().to_string(),
            place_id: place.id,
        });
        Ok(())
    }

    fn delete_place(&self, session: &Session, id: &PlaceId) -> AppResult<bool> {
        let removed = self.write(session, |d| d.remove_place(id));
        if removed {
            self.feed.publish(&StoreChange::PlaceDeleted {
                user: session.user_id().to_string(),
                place_id: *id,
            });
        }
        Ok(removed)
    }

    fn list_records(&self, session: &Session, place: &PlaceId) -> AppResult<Vec<DailyRecord>> {
        Ok(self.read(session, |d| d.records_of(place)))
    }

    fn get_record(
        &self,
        session: &Session,
        place: &PlaceId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyRecord>> {
        Ok(self.read(session, |d| d.record_on(place, date).cloned()))
    }

    fn put_record(&self, session: &Session, record: &DailyRecord) -> AppResult<()> {
        self.write(session, |d| d.upsert_record(record));
        self.feed.publish(&StoreChange::RecordSaved {
            user: session.user_id().to_string(),
            place_id: record.place_id,
            date: record.date,
        });
        Ok(())
    }

    fn delete_record(
        &self,
        session: &Session,
        place: &PlaceId,
        record_id: &RecordId,
    ) -> AppResult<bool> {
        let removed = self.write(session, |d| d.remove_record(place, record_id));
        if removed {
            self.feed.publish(&StoreChange::RecordDeleted {
                user: session.user_id().to_string(),
                place_id: *place,
                record_id: *record_id,
            });
        }
        Ok(removed)
    }

    fn clear(&self, session: &Session) -> AppResult<()> {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session.user_id());
        self.feed.publish(&StoreChange::Cleared {
            user: session.user_id().to_string(),
        });
        Ok(())
    }

    fn subscribe(&self, listener: Box<dyn Fn(&StoreChange) + Send + Sync>) -> Subscription {
        self.feed.subscribe(listener)
    }
}
