// src/db/settings.rs
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// Key of the persisted API URL override.
pub const API_URL_KEY: &str = "api_url";

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, ServerError> {
    conn.query_row(
        "select value from settings where key = ?",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("read setting {key} failed: {e}")))
}

pub fn set_setting(conn: &Connection, key: &str, value: &str, now: i64) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into settings (key, value, updated_at) values (?1, ?2, ?3)
        on conflict(key) do update set value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![key, value, now],
    )
    .map_err(|e| ServerError::DbError(format!("write setting {key} failed: {e}")))?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<(), ServerError> {
    conn.execute("delete from settings where key = ?", params![key])
        .map_err(|e| ServerError::DbError(format!("clear setting {key} failed: {e}")))?;
    Ok(())
}
