//! `Version_Info` schema audit trail and `Log_Entries` operational log
//! (§4.4). Schema evolution itself is tracked with `rusqlite_migration`.

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use super::error::SchemaError;

/// `.NET`-style date format used throughout this file format (§6).
pub const DATE_FORMAT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

const CURRENT_SCHEMA_VERSION: i64 = 1;

static MIGRATIONS: Migrations = Migrations::new(vec![M::up(
    "CREATE TABLE IF NOT EXISTS Version_Info (
        SchemaVersion INTEGER NOT NULL,
        AppliedAt TEXT NOT NULL
    );",
)]);

/// Bring `Version_Info`'s bookkeeping table up to date and record the
/// current schema version if this is the first time the file has been
/// opened by this crate.
pub fn apply_migrations(conn: &mut Connection) -> Result<(), SchemaError> {
    MIGRATIONS.to_latest(conn)?;
    conn.execute(
        "INSERT INTO Version_Info (SchemaVersion, AppliedAt)
         SELECT ?1, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE NOT EXISTS (SELECT 1 FROM Version_Info)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Append one row to the operational log (`Writer::post_log_entry`, §4.5).
pub fn post_log_entry(
    conn: &Connection,
    entry_type: &str,
    message: &str,
    posted_by: &str,
) -> Result<(), SchemaError> {
    let posted_at = chrono::Local::now().format(DATE_FORMAT).to_string();
    conn.execute(
        "INSERT INTO Log_Entries (EntryType, Message, PostedBy, PostedAt) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![entry_type, message, posted_by, posted_at],
    )?;
    Ok(())
}
