//! Wellness-log CRUD — one entry per metric snapshot.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use tracing::info;
use uuid::Uuid;

use crate::error::{RecordError, Result};
use crate::types::{WellnessLog, WellnessLogUpdate};

fn row_to_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<WellnessLog> {
    let date: String = row.get(6)?;
    let date = date.parse::<NaiveDate>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            e.to_string().into(),
        )
    })?;
    Ok(WellnessLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sleep_hours: row.get(2)?,
        water_intake_liters: row.get(3)?,
        steps: row.get(4)?,
        mood: row.get(5)?,
        date,
    })
}

const LOG_SELECT_SQL: &str = "SELECT id, user_id, sleep_hours, water_intake_liters, steps, mood,
            date FROM wellness_logs";

#[derive(Clone)]
pub struct WellnessStore {
    conn: Arc<Mutex<Connection>>,
}

impl WellnessStore {
    pub fn new(conn: Connection) -> Result<Self> {
        crate::db::init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn create(
        &self,
        user_id: &str,
        sleep_hours: f64,
        water_intake_liters: f64,
        steps: i64,
        mood: Option<&str>,
        date: NaiveDate,
    ) -> Result<WellnessLog> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO wellness_logs
             (id, user_id, sleep_hours, water_intake_liters, steps, mood, date)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            rusqlite::params![
                id,
                user_id,
                sleep_hours,
                water_intake_liters,
                steps,
                mood,
                date.to_string()
            ],
        )?;
        info!(log_id = %id, %user_id, date = %date, "wellness log created");
        Ok(WellnessLog {
            id,
            user_id: user_id.to_string(),
            sleep_hours,
            water_intake_liters,
            steps,
            mood: mood.map(String::from),
            date,
        })
    }

    pub fn get(&self, id: &str) -> Result<WellnessLog> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(&format!("{LOG_SELECT_SQL} WHERE id = ?1"), [id], row_to_log)
            .optional()?
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<WellnessLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{LOG_SELECT_SQL} WHERE user_id = ?1 ORDER BY date DESC"
        ))?;
        let logs = stmt
            .query_map([user_id], row_to_log)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// The user's log for a specific date, if one was recorded.
    pub fn log_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Option<WellnessLog>> {
        let conn = self.conn.lock().unwrap();
        let log = conn
            .query_row(
                &format!("{LOG_SELECT_SQL} WHERE user_id = ?1 AND date = ?2"),
                rusqlite::params![user_id, date.to_string()],
                row_to_log,
            )
            .optional()?;
        Ok(log)
    }

    /// Apply a partial update; unset fields keep their stored values.
    pub fn update(&self, id: &str, update: WellnessLogUpdate) -> Result<WellnessLog> {
        {
            let conn = self.conn.lock().unwrap();
            let n = conn.execute(
                "UPDATE wellness_logs SET
                    sleep_hours         = COALESCE(?2, sleep_hours),
                    water_intake_liters = COALESCE(?3, water_intake_liters),
                    steps               = COALESCE(?4, steps),
                    mood                = COALESCE(?5, mood)
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    update.sleep_hours,
                    update.water_intake_liters,
                    update.steps,
                    update.mood
                ],
            )?;
            if n == 0 {
                return Err(RecordError::NotFound(id.to_string()));
            }
        }
        self.get(id)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM wellness_logs WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(RecordError::NotFound(id.to_string()));
        }
        info!(log_id = %id, "wellness log deleted");
        Ok(())
    }
}
