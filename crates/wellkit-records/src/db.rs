use rusqlite::{Connection, Result};

/// Initialise all tables for the records subsystem. Safe to call on every
/// startup — CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_habits_table(conn)?;
    create_habit_completions_table(conn)?;
    create_wellness_logs_table(conn)?;
    Ok(())
}

fn create_habits_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id          TEXT NOT NULL PRIMARY KEY,
            user_id     TEXT NOT NULL,
            name        TEXT NOT NULL,
            frequency   TEXT NOT NULL,      -- 'daily' | 'weekly' | 'monthly'
            created_at  TEXT NOT NULL
        ) STRICT;
        CREATE INDEX IF NOT EXISTS idx_habits_user ON habits (user_id);",
    )
}

fn create_habit_completions_table(conn: &Connection) -> Result<()> {
    // UNIQUE(habit_id, completed_on): at most one completion per habit per day.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habit_completions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id     TEXT NOT NULL,
            completed_on TEXT NOT NULL,     -- YYYY-MM-DD
            UNIQUE(habit_id, completed_on)
        );
        CREATE INDEX IF NOT EXISTS idx_completions_habit
            ON habit_completions (habit_id, completed_on DESC);",
    )
}

fn create_wellness_logs_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS wellness_logs (
            id                   TEXT NOT NULL PRIMARY KEY,
            user_id              TEXT NOT NULL,
            sleep_hours          REAL NOT NULL DEFAULT 0,
            water_intake_liters  REAL NOT NULL DEFAULT 0,
            steps                INTEGER NOT NULL DEFAULT 0,
            mood                 TEXT,
            date                 TEXT NOT NULL   -- YYYY-MM-DD
        ) STRICT;
        CREATE INDEX IF NOT EXISTS idx_wellness_user
            ON wellness_logs (user_id, date DESC);",
    )
}
