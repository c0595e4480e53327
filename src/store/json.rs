//! Durable local backend: a single pretty-printed JSON document.
//!
//! The whole file is read, modified and rewritten on every write. Writes go
//! to a sibling temp file first and are renamed into place.

use super::{Backend, Feed, Store, StoreChange, Subscription, UserData};
use crate::errors::{AppError, AppResult};
use crate::models::{DailyRecord, Place, PlaceId, RecordId};
use crate::session::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const FILE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    users: BTreeMap<String, UserData>,
}

pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
    feed: Feed<StoreChange>,
}

impl JsonStore {
    pub fn open(path: &str) -> AppResult<Self> {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
            feed: Feed::new(),
        };

        if !store.path.exists() {
            store.write_file(&StoreFile {
                version: FILE_VERSION,
                users: BTreeMap::new(),
            })?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> AppResult<StoreFile> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let data: StoreFile = serde_json::from_reader(reader)?;
        if data.version > FILE_VERSION {
            return Err(AppError::Storage(format!(
                "{} was written by a newer version (format {})",
                self.path.display(),
                data.version
            )));
        }
        Ok(data)
    }

    fn write_file(&self, data: &StoreFile) -> AppResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, data)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read<T>(&self, session: &Session, f: impl FnOnce(&UserData) -> T) -> AppResult<T> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let data = self.read_file()?;
        Ok(match data.users.get(session.user_id()) {
            Some(user) => f(user),
            None => f(&UserData::default()),
        })
    }

    fn modify<T>(&self, session: &Session, f: impl FnOnce(&mut UserData) -> T) -> AppResult<T> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut data = self.read_file()?;
        data.version = FILE_VERSION;
        let out = f(data.users.entry(session.user_id().to_string()).or_default());
        self.write_file(&data)?;
        Ok(out)
    }
}

impl Store for JsonStore {
    fn backend(&self) -> Backend {
        Backend::Json
    }

    fn list_places(&self, session: &Session) -> AppResult<Vec<Place>> {
        self.read(session, |d| d.places.clone())
    }

    fn get_place(&self, session: &Session, id: &PlaceId) -> AppResult<Option<Place>> {
        self.read(session, |d| d.place(id).cloned())
    }

    fn put_place(&self, session: &Session, place: &Place) -> AppResult<()> {
        self.modify(session, |d| d.upsert_place(place))?;
        self.feed.publish(&StoreChange::PlaceSaved {
            user: session.user_id().to_string(),
            place_id: place.id,
        });
        Ok(())
    }

    fn delete_place(&self, session: &Session, id: &PlaceId) -> AppResult<bool> {
        let removed = self.modify(session, |d| d.remove_place(id))?;
        if removed {
            self.feed.publish(&StoreChange::PlaceDeleted {
                user: session.user_id().to_string(),
                place_id: *id,
            });
        }
        Ok(removed)
    }

    fn list_records(&self, session: &Session, place: &PlaceId) -> AppResult<Vec<DailyRecord>> {
        self.read(session, |d| d.records_of(place))
    }

    fn get_record(
        &self,
        session: &Session,
        place: &PlaceId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyRecord>> {
        self.read(session, |d| d.record_on(place, date).cloned())
    }

    fn put_record(&self, session: &Session, record: &DailyRecord) -> AppResult<()> {
        self.modify(session, |d| d.upsert_record(record))?;
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
        let removed = self.modify(session, |d| d.remove_record(place, record_id))?;
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
        {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut data = self.read_file()?;
            data.users.remove(session.user_id());
            self.write_file(&data)?;
        }
        self.feed.publish(&StoreChange::Cleared {
            user: session.user_id().to_string(),
        });
        Ok(())
    }

    fn subscribe(&self, listener: Box<dyn Fn(&StoreChange) + Send + Sync>) -> Subscription {
        self.feed.subscribe(listener)
    }
}
