//! SQLite store with the same layout as the backend's `job_areas` table.
//!
//! Serves the command-line tool and tests; the web and mobile clients talk
//! to the backend instead.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde_json::Value;

use crate::record::{AreaRecord, AreasApi, NewArea};

pub struct AreaDb {
    conn: Connection,
}

impl AreaDb {
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS job_areas (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                job_id INTEGER NOT NULL,
                customer_id INTEGER,
                area_name TEXT NOT NULL,
                area_value TEXT NOT NULL,
                unit TEXT NOT NULL,
                shape_data TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )?;
        Ok(Self { conn })
    }

    fn get(&self, id: i64) -> rusqlite::Result<AreaRecord> {
        self.conn.query_row(
            "SELECT id, user_id, job_id, customer_id, area_name, area_value, unit, shape_data, created_at
             FROM job_areas WHERE id = ?1",
            params![id],
            row_to_record,
        )
    }

    fn query(&self, user_id: i64, job_id: Option<i64>) -> rusqlite::Result<Vec<AreaRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, job_id, customer_id, area_name, area_value, unit, shape_data, created_at
             FROM job_areas
             WHERE user_id = ?1 AND (?2 IS NULL OR job_id = ?2)
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id, job_id], row_to_record)?;
        let mut res = Vec::new();
        for r in rows {
            res.push(r?);
        }
        Ok(res)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<AreaRecord> {
    let area_value: String = row.get(5)?;
    let created_at: String = row.get(8)?;
    Ok(AreaRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        job_id: row.get(2)?,
        customer_id: row.get(3)?,
        area_name: row.get(4)?,
        area_value: area_value
            .trim()
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
        unit: row.get(6)?,
        shape_data: Value::String(row.get(7)?),
        created_at: Some(
            DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?
                .with_timezone(&Utc),
        ),
    })
}

impl AreasApi for AreaDb {
    type Error = rusqlite::Error;

    fn create_area(&mut self, area: &NewArea) -> rusqlite::Result<AreaRecord> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.conn.execute(
            "INSERT INTO job_areas (user_id, job_id, customer_id, area_name, area_value, unit, shape_data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                area.user_id,
                area.job_id,
                area.customer_id,
                area.area_name,
                area.area_value,
                area.unit,
                area.shape_data,
                created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("saved area {} `{}` for job {}", id, area.area_name, area.job_id);
        self.get(id)
    }

    fn areas_for_job(&self, job_id: i64, user_id: i64) -> rusqlite::Result<Vec<AreaRecord>> {
        self.query(user_id, Some(job_id))
    }

    fn areas_for_user(&self, user_id: i64) -> rusqlite::Result<Vec<AreaRecord>> {
        self.query(user_id, None)
    }

    fn delete_area(&mut self, id: i64, user_id: i64) -> rusqlite::Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM job_areas WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if removed > 0 {
            log::info!("deleted area {}", id);
        }
        Ok(removed > 0)
    }
}
