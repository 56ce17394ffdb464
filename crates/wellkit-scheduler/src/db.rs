use rusqlite::Connection;

use crate::error::Result;

/// Initialise the scheduler schema in `conn`.
///
/// Creates the `reminders` table (idempotent) and an index on
/// `(state, reminder_time)` so the startup recovery scan stays efficient
/// even with thousands of reminders.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reminders (
            id             TEXT NOT NULL PRIMARY KEY,
            user_id        TEXT NOT NULL,
            title          TEXT NOT NULL,
            kind           TEXT NOT NULL,       -- 'habit' | 'wellness'
            target_id      TEXT,                -- opaque record reference
            reminder_time  TEXT NOT NULL,       -- RFC3339, original offset
            repeat         TEXT NOT NULL DEFAULT 'none',
            state          TEXT NOT NULL DEFAULT 'scheduled',
            created_at     TEXT NOT NULL
        ) STRICT;

        -- Recovery scan: SELECT … WHERE state = 'scheduled'
        CREATE INDEX IF NOT EXISTS idx_reminders_state_time
            ON reminders (state, reminder_time);
        CREATE INDEX IF NOT EXISTS idx_reminders_user
            ON reminders (user_id);
        ",
    )?;
    Ok(())
}
