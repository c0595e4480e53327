//! Versioned schema migrations.
//!
//! Each migration runs once, inside its own transaction, and is recorded in
//! the `log` table as `migration_applied` with the version as target.

use rusqlite::{Connection, OptionalExtension, Result, params};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_create_places",
        description: "Created places table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS places (
                id             TEXT PRIMARY KEY,
                user_id        TEXT NOT NULL,
                name           TEXT NOT NULL,
                worker_rate    REAL NOT NULL DEFAULT 0,
                labourer_rate  REAL NOT NULL DEFAULT 0,
                created_at     TEXT NOT NULL,
                updated_at     TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_places_user ON places(user_id);
        "#,
    },
    Migration {
        version: "20250901_0002_create_daily_records",
        description: "Created daily_records table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS daily_records (
                id                TEXT PRIMARY KEY,
                user_id           TEXT NOT NULL,
                place_id          TEXT NOT NULL,
                date              TEXT NOT NULL,
                workers           INTEGER NOT NULL DEFAULT 0,
                labourers         INTEGER NOT NULL DEFAULT 0,
                additional_costs  TEXT NOT NULL DEFAULT '[]',
                notes             TEXT,
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL,
                UNIQUE(user_id, place_id, date)
            );

            CREATE INDEX IF NOT EXISTS idx_records_place_date
                ON daily_records(user_id, place_id, date);
        "#,
    },
    Migration {
        version: "20250915_0003_add_rate_snapshot",
        description: "Added rate snapshot columns to daily_records",
        sql: r#"
            ALTER TABLE daily_records ADD COLUMN worker_rate REAL;
            ALTER TABLE daily_records ADD COLUMN labourer_rate REAL;
        "#,
    },
];

/// Ensure that the `log` table exists. Everything else depends on it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![chrono::Local::now().to_rfc3339(), m.version, m.description],
    )?;
    tx.commit()
}

/// Versions not yet applied to this database, oldest first.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Run every pending migration and return the versions applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        tracing::debug!(version = m.version, "migration applied");
        applied.push(m.version);
    }

    Ok(applied)
}
