use rusqlite::{params, Connection, OptionalExtension, Result};
use std::fs;

use crate::config::StoreConfig;
use crate::error::StoreError;

const MIGRATION_KV_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);";

pub fn init_db(config: &StoreConfig) -> std::result::Result<Connection, StoreError> {
    let data_dir = config.data_dir();
    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    let conn = Connection::open(config.db_path())?;
    migrate(&conn)?;
    log::info!("store opened: {}", config.db_path().display());
    Ok(conn)
}

pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrate(&conn)?;
    Ok(conn)
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            id TEXT PRIMARY KEY NOT NULL,
            applied_at INTEGER NOT NULL
        );",
    )?;
    apply_migration(conn, "0000_kv_store", MIGRATION_KV_SQL)?;
    Ok(())
}

fn apply_migration(conn: &Connection, id: &str, sql: &str) -> Result<()> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM schema_migrations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Ok(());
    }
    conn.execute_batch(sql)?;
    conn.execute(
        "INSERT INTO schema_migrations (id, applied_at) VALUES (?1, ?2)",
        params![id, chrono::Utc::now().timestamp_millis()],
    )?;
    log::info!("applied migration {}", id);
    Ok(())
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn put_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, value, chrono::Utc::now().timestamp_millis()],
    )?;
    Ok(())
}
