use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::time::Duration;

/// Initialize the database and return the migrations that were applied.
/// Schema creation and upgrades all go through the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<Vec<&'static str>> {
    conn.busy_timeout(Duration::from_secs(5))?;
    let applied = run_pending_migrations(conn)?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "database schema upgraded");
    }
    Ok(applied)
}
