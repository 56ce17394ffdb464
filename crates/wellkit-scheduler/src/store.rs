//! Durable reminder store.
//!
//! The store is the single source of truth for reminder lifecycle. All
//! transitions out of `scheduled` go through conditional writes
//! (`UPDATE … WHERE state = 'scheduled'`), so a firing timer and a
//! concurrent cancel from another task — or another process sharing the
//! database file — can never both win.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use wellkit_core::reminder::{NewReminder, Reminder, ReminderKind, ReminderState, RepeatRule};

use crate::db::init_db;
use crate::error::{Result, SchedulerError};

/// Column order shared by every SELECT in this module.
const REMINDER_SELECT_SQL: &str = "SELECT id, user_id, title, kind, target_id, reminder_time,
            repeat, state, created_at FROM reminders";

/// Map a SELECT row (column order from REMINDER_SELECT_SQL) to a Reminder.
/// Centralised here so every query in this crate stays consistent.
fn row_to_reminder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reminder> {
    let kind = ReminderKind::from_str(&row.get::<_, String>(3)?).map_err(|e| bad_column(3, e))?;
    let reminder_time = DateTime::parse_from_rfc3339(&row.get::<_, String>(5)?)
        .map_err(|e| bad_column(5, e.to_string()))?;
    let repeat = RepeatRule::from_str(&row.get::<_, String>(6)?).map_err(|e| bad_column(6, e))?;
    let state = ReminderState::from_str(&row.get::<_, String>(7)?).map_err(|e| bad_column(7, e))?;
    let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>(8)?)
        .map_err(|e| bad_column(8, e.to_string()))?
        .with_timezone(&Utc);

    Ok(Reminder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        kind,
        target_id: row.get(4)?,
        reminder_time,
        repeat,
        state,
        created_at,
    })
}

fn bad_column(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
}

/// Shared handle over a SQLite connection.
///
/// Clones share the same connection, so the engine's timer tasks and the
/// job-control façade see one consistent view. Critical sections are short
/// single statements.
#[derive(Clone)]
pub struct ReminderStore {
    conn: Arc<Mutex<Connection>>,
}

impl ReminderStore {
    /// Wrap `conn`, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new reminder in state `scheduled`. Two identical inputs
    /// produce two independent records — scheduling is never deduplicated.
    pub fn create(&self, new: NewReminder) -> Result<Reminder> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO reminders
             (id, user_id, title, kind, target_id, reminder_time, repeat, state, created_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,'scheduled',?8)",
            rusqlite::params![
                id,
                new.user_id,
                new.title,
                new.kind.to_string(),
                new.target_id,
                new.reminder_time.to_rfc3339(),
                new.repeat.to_string(),
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Reminder {
            id,
            user_id: new.user_id,
            title: new.title,
            kind: new.kind,
            target_id: new.target_id,
            reminder_time: new.reminder_time,
            repeat: new.repeat,
            state: ReminderState::Scheduled,
            created_at,
        })
    }

    pub fn get(&self, id: &str) -> Result<Reminder> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("{REMINDER_SELECT_SQL} WHERE id = ?1"),
            [id],
            row_to_reminder,
        )
        .optional()?
        .ok_or_else(|| SchedulerError::NotFound { id: id.to_string() })
    }

    /// Move `reminder_time` while the reminder is still `scheduled`.
    /// Conflict if it has already fired or been cancelled.
    pub fn update_time(&self, id: &str, new_time: DateTime<FixedOffset>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE reminders SET reminder_time = ?2
             WHERE id = ?1 AND state = 'scheduled'",
            rusqlite::params![id, new_time.to_rfc3339()],
        )?;
        Self::check_conditional(&conn, id, n)
    }

    /// Transition `scheduled` → `fired`. The compare-and-swap covers both
    /// the state and the expected `reminder_time`, so a firing loses to a
    /// concurrent cancel *and* to a reschedule that moved the time after the
    /// timer was already dequeued.
    pub fn mark_fired(&self, id: &str, expected_time: DateTime<FixedOffset>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE reminders SET state = 'fired'
             WHERE id = ?1 AND state = 'scheduled' AND reminder_time = ?2",
            rusqlite::params![id, expected_time.to_rfc3339()],
        )?;
        Self::check_conditional(&conn, id, n)
    }

    /// Transition `scheduled` → `cancelled`. Conflict if the reminder
    /// already fired (or was already cancelled).
    pub fn cancel(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE reminders SET state = 'cancelled'
             WHERE id = ?1 AND state = 'scheduled'",
            [id],
        )?;
        Self::check_conditional(&conn, id, n)
    }

    /// Advance a repeating reminder from `from_time` to `next_time`, keeping
    /// state `scheduled`. CAS on both state and the previous time: if a
    /// cancel or reschedule landed first, this reports Conflict and the late
    /// firing must not deliver.
    pub fn advance_occurrence(
        &self,
        id: &str,
        from_time: DateTime<FixedOffset>,
        next_time: DateTime<FixedOffset>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE reminders SET reminder_time = ?3
             WHERE id = ?1 AND state = 'scheduled' AND reminder_time = ?2",
            rusqlite::params![id, from_time.to_rfc3339(), next_time.to_rfc3339()],
        )?;
        Self::check_conditional(&conn, id, n)
    }

    /// All reminders still in state `scheduled`, soonest first. Used by the
    /// engine's startup recovery.
    pub fn list_pending(&self) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{REMINDER_SELECT_SQL} WHERE state = 'scheduled' ORDER BY reminder_time"
        ))?;
        let reminders = stmt
            .query_map([], row_to_reminder)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reminders)
    }

    /// All reminders owned by `user_id`, oldest first.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{REMINDER_SELECT_SQL} WHERE user_id = ?1 ORDER BY created_at"
        ))?;
        let reminders = stmt
            .query_map([user_id], row_to_reminder)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reminders)
    }

    /// Zero rows from a conditional UPDATE means either the row is missing
    /// (NotFound) or its state/time no longer matched (Conflict).
    fn check_conditional(conn: &Connection, id: &str, rows: usize) -> Result<()> {
        if rows > 0 {
            return Ok(());
        }
        let exists = conn
            .query_row("SELECT 1 FROM reminders WHERE id = ?1", [id], |_| Ok(()))
            .optional()?
            .is_some();
        if exists {
            Err(SchedulerError::Conflict { id: id.to_string() })
        } else {
            Err(SchedulerError::NotFound { id: id.to_string() })
        }
    }
}
