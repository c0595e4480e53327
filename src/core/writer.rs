//! Fire-and-forget writes.
//!
//! Mutations are queued on a channel and applied to the store by one
//! background thread, in submission order. The caller never waits on a
//! write. When a write fails the error is published on the [`ErrorBus`];
//! nothing is retried and nothing is rolled back.

use crate::errors::AppResult;
use crate::models::place::short_id;
use crate::models::{DailyRecord, Place, PlaceId, RecordId};
use crate::session::Session;
use crate::store::{Feed, Store};
use serde::Serialize;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

/// One mutation to apply to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    PutPlace(Place),
    DeletePlace(PlaceId),
    PutRecord(DailyRecord),
    DeleteRecord {
        place_id: PlaceId,
        record_id: RecordId,
    },
    Clear,
}

impl WriteOp {
    pub fn describe(&self) -> String {
        match self {
            WriteOp::PutPlace(p) => format!("save site '{}'", p.name),
            WriteOp::DeletePlace(id) => format!("delete site {}", short_id(id)),
            WriteOp::PutRecord(r) => {
                format!("save record {} for site {}", r.date_str(), short_id(&r.place_id))
            }
            WriteOp::DeleteRecord {
                place_id,
                record_id,
            } => format!(
                "delete record {} from site {}",
                short_id(record_id),
                short_id(place_id)
            ),
            WriteOp::Clear => "clear all data".to_string(),
        }
    }

    fn apply(&self, store: &dyn Store, session: &Session) -> AppResult<()> {
        match self {
            WriteOp::PutPlace(p) => store.put_place(session, p),
            WriteOp::DeletePlace(id) => store.delete_place(session, id).map(|_| ()),
            WriteOp::PutRecord(r) => store.put_record(session, r),
            WriteOp::DeleteRecord {
                place_id,
                record_id,
            } => store.delete_record(session, place_id, record_id).map(|_| ()),
            WriteOp::Clear => store.clear(session),
        }
    }
}

/// A write that the store rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteFailure {
    pub op: String,
    pub error: String,
}

/// Side channel for asynchronous write failures.
pub type ErrorBus = Feed<WriteFailure>;

enum Job {
    Write(Session, WriteOp),
    Flush(Sender<()>),
}

pub struct WriteQueue {
    tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    errors: ErrorBus,
}

impl WriteQueue {
    pub fn start(store: Arc<dyn Store>, errors: ErrorBus) -> AppResult<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let bus = errors.clone();

        let worker = thread::Builder::new()
            .name("sitebook-writer".into())
            .spawn(move || {
                for job in rx {
                    match job {
                        Job::Write(session, op) => {
                            if let Err(e) = op.apply(store.as_ref(), &session) {
                                tracing::warn!(op = %op.describe(), error = %e, "write failed");
                                bus.publish(&WriteFailure {
                                    op: op.describe(),
                                    error: e.to_string(),
                                });
                            }
                        }
                        Job::Flush(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
                tracing::debug!("write queue drained");
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
            errors,
        })
    }

    /// Queue a write and return immediately.
    pub fn submit(&self, session: &Session, op: WriteOp) {
        let job = Job::Write(session.clone(), op);
        let sent = match &self.tx {
            Some(tx) => tx.send(job).map_err(|e| e.0),
            None => Err(job),
        };

        if let Err(Job::Write(_, op)) = sent {
            self.errors.publish(&WriteFailure {
                op: op.describe(),
                error: "write queue is closed".to_string(),
            });
        }
    }

    /// Block until every write submitted before this call has been applied.
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(Job::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the backlog is applied.
        self.tx.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::error!("write queue worker panicked");
        }
    }
}
