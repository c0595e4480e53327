//! SQLite backend. Every mutation is also written to the audit `log` table.

use super::{Backend, Feed, Store, StoreChange, Subscription};
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::place::short_id;
use crate::models::{AdditionalCost, DailyRecord, Place, PlaceId, Rates, RecordId};
use crate::session::Session;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub struct SqliteStore {
    pool: Mutex<DbPool>,
    path: String,
    feed: Feed<StoreChange>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and bring its schema
    /// up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let pool = DbPool::new(path)?;
        Self::with_pool(pool, path)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_pool(DbPool::in_memory()?, ":memory:")
    }

    fn with_pool(pool: DbPool, path: &str) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self {
            pool: Mutex::new(pool),
            path: path.to_string(),
            feed: Feed::new(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn pool(&self) -> MutexGuard<'_, DbPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn conversion_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn get_uuid(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_err(idx, e))
}

fn get_timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

const PLACE_COLUMNS: &str = "id, name, worker_rate, labourer_rate, created_at, updated_at";

fn row_to_place(row: &Row) -> rusqlite::Result<Place> {
    Ok(Place {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        worker_rate: row.get(2)?,
        labourer_rate: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
        updated_at: get_timestamp(row, 5)?,
    })
}

const RECORD_COLUMNS: &str = "id, place_id, date, workers, labourers, additional_costs, notes, \
     worker_rate, labourer_rate, created_at, updated_at";

fn row_to_record(row: &Row) -> rusqlite::Result<DailyRecord> {
    let raw_date: String = row.get(2)?;
    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|e| conversion_err(2, e))?;

    let raw_costs: String = row.get(5)?;
    let additional_costs: Vec<AdditionalCost> =
        serde_json::from_str(&raw_costs).map_err(|e| conversion_err(5, e))?;

    let worker_rate: Option<f64> = row.get(7)?;
    let labourer_rate: Option<f64> = row.get(8)?;
    let rates = match (worker_rate, labourer_rate) {
        (Some(w), Some(l)) => Some(Rates::new(w, l)),
        _ => None,
    };

    Ok(DailyRecord {
        id: get_uuid(row, 0)?,
        place_id: get_uuid(row, 1)?,
        date,
        workers: row.get(3)?,
        labourers: row.get(4)?,
        additional_costs,
        notes: row.get(6)?,
        rates,
        created_at: get_timestamp(row, 9)?,
        updated_at: get_timestamp(row, 10)?,
    })
}

fn query_place(conn: &Connection, user: &str, id: &PlaceId) -> rusqlite::Result<Option<Place>> {
    conn.query_row(
        &format!("SELECT {PLACE_COLUMNS} FROM places WHERE user_id = ?1 AND id = ?2"),
        params![user, id.to_string()],
        row_to_place,
    )
    .optional()
}

impl Store for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn list_places(&self, session: &Session) -> AppResult<Vec<Place>> {
        let pool = self.pool();
        let mut stmt = pool.conn.prepare_cached(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE user_id = ?1 ORDER BY created_at ASC, name ASC"
        ))?;
        let rows = stmt.query_map([session.user_id()], row_to_place)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn get_place(&self, session: &Session, id: &PlaceId) -> AppResult<Option<Place>> {
        let pool = self.pool();
        Ok(query_place(&pool.conn, session.user_id(), id)?)
    }

    fn put_place(&self, session: &Session, place: &Place) -> AppResult<()> {
        {
            let mut pool = self.pool();
            let tx = pool.conn.transaction()?;
            tx.execute(
                "INSERT INTO places (id, user_id, name, worker_rate, labourer_rate, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     worker_rate = excluded.worker_rate,
                     labourer_rate = excluded.labourer_rate,
                     updated_at = excluded.updated_at
                 WHERE places.user_id = excluded.user_id",
                params![
                    place.id.to_string(),
                    session.user_id(),
                    place.name,
                    place.worker_rate,
                    place.labourer_rate,
                    place.created_at.to_rfc3339(),
                    place.updated_at.to_rfc3339(),
                ],
            )?;
            ttlog(
                &tx,
                "site",
                &place.short_id(),
                &format!(
                    "{}: '{}' worker={} labourer={}",
                    session, place.name, place.worker_rate, place.labourer_rate
                ),
            )?;
            tx.commit()?;
        }

        self.feed.publish(&StoreChange::PlaceSaved {
            user: session.user_id().to_string(),
            place_id: place.id,
        });
        Ok(())
    }

    fn delete_place(&self, session: &Session, id: &PlaceId) -> AppResult<bool> {
        let removed = {
            let mut pool = self.pool();
            let tx = pool.conn.transaction()?;
            let records = tx.execute(
                "DELETE FROM daily_records WHERE user_id = ?1 AND place_id = ?2",
                params![session.user_id(), id.to_string()],
            )?;
            let places = tx.execute(
                "DELETE FROM places WHERE user_id = ?1 AND id = ?2",
                params![session.user_id(), id.to_string()],
            )?;
            if places > 0 {
                ttlog(
                    &tx,
                    "del_site",
                    &short_id(id),
                    &format!("{}: site deleted with {} record(s)", session, records),
                )?;
            }
            tx.commit()?;
            places > 0
        };

        if removed {
            self.feed.publish(&StoreChange::PlaceDeleted {
                user: session.user_id().to_string(),
                place_id: *id,
            });
        }
        Ok(removed)
    }

    fn list_records(&self, session: &Session, place: &PlaceId) -> AppResult<Vec<DailyRecord>> {
        let pool = self.pool();
        let mut stmt = pool.conn.prepare_cached(&format!(
            "SELECT {RECORD_COLUMNS} FROM daily_records
             WHERE user_id = ?1 AND place_id = ?2
             ORDER BY date ASC"
        ))?;
        let rows = stmt.query_map(params![session.user_id(), place.to_string()], row_to_record)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn get_record(
        &self,
        session: &Session,
        place: &PlaceId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyRecord>> {
        let pool = self.pool();
        let record = pool
            .conn
            .query_row(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM daily_records
                     WHERE user_id = ?1 AND place_id = ?2 AND date = ?3"
                ),
                params![
                    session.user_id(),
                    place.to_string(),
                    date.format("%Y-%m-%d").to_string()
                ],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn put_record(&self, session: &Session, record: &DailyRecord) -> AppResult<()> {
        let costs = serde_json::to_string(&record.additional_costs)?;
        {
            let mut pool = self.pool();
            let tx = pool.conn.transaction()?;
            tx.execute(
                "INSERT INTO daily_records
                     (id, user_id, place_id, date, workers, labourers, additional_costs, notes,
                      worker_rate, labourer_rate, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(user_id, place_id, date) DO UPDATE SET
                     workers = excluded.workers,
                     labourers = excluded.labourers,
                     additional_costs = excluded.additional_costs,
                     notes = excluded.notes,
                     worker_rate = excluded.worker_rate,
                     labourer_rate = excluded.labourer_rate,
                     updated_at = excluded.updated_at",
                params![
                    record.id.to_string(),
                    session.user_id(),
                    record.place_id.to_string(),
                    record.date_str(),
                    record.workers,
                    record.labourers,
                    costs,
                    record.notes,
                    record.rates.map(|r| r.worker),
                    record.rates.map(|r| r.labourer),
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            ttlog(
                &tx,
                "add",
                &record.date_str(),
                &format!(
                    "{}: site {} workers={} labourers={} costs={}",
                    session,
                    short_id(&record.place_id),
                    record.workers,
                    record.labourers,
                    record.additional_costs.len()
                ),
            )?;
            tx.commit()?;
        }

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
        let removed = {
            let mut pool = self.pool();
            let tx = pool.conn.transaction()?;
            let n = tx.execute(
                "DELETE FROM daily_records WHERE user_id = ?1 AND place_id = ?2 AND id = ?3",
                params![session.user_id(), place.to_string(), record_id.to_string()],
            )?;
            if n > 0 {
                ttlog(
                    &tx,
                    "del",
                    &short_id(record_id),
                    &format!("{}: record deleted from site {}", session, short_id(place)),
                )?;
            }
            tx.commit()?;
            n > 0
        };

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
            let mut pool = self.pool();
            let tx = pool.conn.transaction()?;
            let records = tx.execute(
                "DELETE FROM daily_records WHERE user_id = ?1",
                [session.user_id()],
            )?;
            let places = tx.execute("DELETE FROM places WHERE user_id = ?1", [session.user_id()])?;
            ttlog(
                &tx,
                "clear",
                session.user_id(),
                &format!("removed {} site(s) and {} record(s)", places, records),
            )?;
            tx.commit()?;
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
