use crate::errors::ServerError;
use rusqlite::{params, Connection};

#[derive(Debug)]
pub struct LoadRun {
    pub source: String,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub listings_count: Option<i64>,
    pub success: bool,
    pub error_message: Option<String>,
}

pub fn start_load_run(conn: &Connection, source: &str, now: i64) -> Result<i64, ServerError> {
    conn.execute(
        "INSERT INTO load_runs (source, started_at, success) VALUES (?, ?, 0)",
        params![source, now],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn end_load_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    listings: usize,
    success: bool,
    error: Option<String>,
) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE load_runs SET finished_at = ?, listings_count = ?, success = ?, error_message = ? WHERE id = ?",
        params![now, listings as i64, success, error, run_id],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

pub fn get_recent_loads(conn: &Connection, limit: usize) -> Result<Vec<LoadRun>, ServerError> {
    let mut stmt = conn
        .prepare("SELECT source, started_at, finished_at, listings_count, success, error_message FROM load_runs ORDER BY started_at DESC, id DESC LIMIT ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(LoadRun {
                source: row.get(0)?,
                started_at: row.get(1)?,
                finished_at: row.get(2)?,
                listings_count: row.get(3)?,
                success: row.get(4)?,
                error_message: row.get(5)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(runs)
}
