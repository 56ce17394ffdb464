//! Habit CRUD plus the per-day completion log.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;
use uuid::Uuid;

use crate::error::{RecordError, Result};
use crate::types::{Habit, HabitFrequency};

fn row_to_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let frequency = HabitFrequency::from_str(&row.get::<_, String>(3)?).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;
    let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>(4)?)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                e.to_string().into(),
            )
        })?
        .with_timezone(&Utc);
    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        frequency,
        created_at,
    })
}

#[derive(Clone)]
pub struct HabitStore {
    conn: Arc<Mutex<Connection>>,
}

impl HabitStore {
    pub fn new(conn: Connection) -> Result<Self> {
        crate::db::init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn create(&self, user_id: &str, name: &str, frequency: HabitFrequency) -> Result<Habit> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO habits (id, user_id, name, frequency, created_at)
             VALUES (?1,?2,?3,?4,?5)",
            rusqlite::params![id, user_id, name, frequency.to_string(), created_at.to_rfc3339()],
        )?;
        info!(habit_id = %id, %user_id, "habit created");
        Ok(Habit {
            id,
            user_id: user_id.to_string(),
            name: name.to_string(),
            frequency,
            created_at,
        })
    }

    pub fn get(&self, id: &str) -> Result<Habit> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, user_id, name, frequency, created_at FROM habits WHERE id = ?1",
            [id],
            row_to_habit,
        )
        .optional()?
        .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, frequency, created_at FROM habits
             WHERE user_id = ?1 ORDER BY created_at",
        )?;
        let habits = stmt
            .query_map([user_id], row_to_habit)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(habits)
    }

    /// Delete a habit and its completion history.
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM habits WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(RecordError::NotFound(id.to_string()));
        }
        conn.execute("DELETE FROM habit_completions WHERE habit_id = ?1", [id])?;
        info!(habit_id = %id, "habit deleted");
        Ok(())
    }

    /// Record a completion for `date`. Logging the same day twice is a
    /// no-op, so streak counting stays honest.
    pub fn log_completion(&self, habit_id: &str, date: NaiveDate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let exists = conn
            .query_row("SELECT 1 FROM habits WHERE id = ?1", [habit_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(RecordError::NotFound(habit_id.to_string()));
        }
        conn.execute(
            "INSERT OR IGNORE INTO habit_completions (habit_id, completed_on)
             VALUES (?1, ?2)",
            rusqlite::params![habit_id, date.to_string()],
        )?;
        Ok(())
    }

    /// Number of the user's habits with a completion logged for `date`.
    pub fn completed_count_on(&self, user_id: &str, date: NaiveDate) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM habit_completions c
             JOIN habits h ON h.id = c.habit_id
             WHERE h.user_id = ?1 AND c.completed_on = ?2",
            rusqlite::params![user_id, date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Completion dates for a habit, most recent first.
    pub fn completions(&self, habit_id: &str) -> Result<Vec<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT completed_on FROM habit_completions
             WHERE habit_id = ?1 ORDER BY completed_on DESC",
        )?;
        let dates = stmt
            .query_map([habit_id], |row| {
                let s: String = row.get(0)?;
                s.parse::<NaiveDate>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        e.to_string().into(),
                    )
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HabitStore {
        HabitStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn create_get_list() {
        let store = store();
        let habit = store
            .create("u-1", "morning run", HabitFrequency::Daily)
            .unwrap();
        assert_eq!(store.get(&habit.id).unwrap().name, "morning run");
        assert_eq!(store.list_for_user("u-1").unwrap().len(), 1);
        assert!(store.list_for_user("u-2").unwrap().is_empty());
    }

    #[test]
    fn delete_removes_habit_and_history() {
        let store = store();
        let habit = store
            .create("u-1", "journal", HabitFrequency::Daily)
            .unwrap();
        store
            .log_completion(&habit.id, "2025-10-21".parse().unwrap())
            .unwrap();

        store.delete(&habit.id).unwrap();
        assert!(matches!(
            store.get(&habit.id),
            Err(RecordError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&habit.id),
            Err(RecordError::NotFound(_))
        ));
    }

    #[test]
    fn completion_per_day_is_deduplicated() {
        let store = store();
        let habit = store
            .create("u-1", "stretch", HabitFrequency::Daily)
            .unwrap();
        let day: NaiveDate = "2025-10-21".parse().unwrap();

        store.log_completion(&habit.id, day).unwrap();
        store.log_completion(&habit.id, day).unwrap();
        store
            .log_completion(&habit.id, "2025-10-22".parse().unwrap())
            .unwrap();

        let dates = store.completions(&habit.id).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].to_string(), "2025-10-22");
    }

    #[test]
    fn completion_for_unknown_habit_is_not_found() {
        let err = store()
            .log_completion("missing", "2025-10-21".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }
}
