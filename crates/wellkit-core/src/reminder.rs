//! Reminder model — shared between the scheduler engine and all notifier
//! backends.
//!
//! `reminder_time` is always a zone-aware instant. The store persists it as
//! RFC3339 with the offset supplied at creation, so the exact local
//! wall-clock the user asked for survives a round-trip through SQLite.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// How a reminder re-arms after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeatRule {
    /// Fire once, then the reminder is terminal.
    #[default]
    None,
    /// Re-arm 24 h later, preserving local time-of-day.
    Daily,
    /// Re-arm 7 days later, preserving local time-of-day.
    Weekly,
}

impl std::fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RepeatRule::None => "none",
            RepeatRule::Daily => "daily",
            RepeatRule::Weekly => "weekly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RepeatRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(RepeatRule::None),
            "daily" => Ok(RepeatRule::Daily),
            "weekly" => Ok(RepeatRule::Weekly),
            other => Err(format!("unknown repeat rule: {other}")),
        }
    }
}

/// Lifecycle state of a reminder. Stored as TEXT in the `reminders` table;
/// every transition out of `Scheduled` goes through a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    /// Waiting for its reminder_time; exactly one engine timer may be armed.
    Scheduled,
    /// Delivered (or delivery attempted) once — terminal for non-repeating.
    Fired,
    /// Cancelled by the user before firing — terminal.
    Cancelled,
}

impl ReminderState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReminderState::Scheduled)
    }
}

impl std::fmt::Display for ReminderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReminderState::Scheduled => "scheduled",
            ReminderState::Fired => "fired",
            ReminderState::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ReminderState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ReminderState::Scheduled),
            "fired" => Ok(ReminderState::Fired),
            "cancelled" => Ok(ReminderState::Cancelled),
            other => Err(format!("unknown reminder state: {other}")),
        }
    }
}

/// What kind of record the reminder points at via `target_id`.
/// The scheduler never dereferences the target; the kind exists so the
/// surrounding CRUD layer can route a fired reminder back to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Habit,
    Wellness,
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReminderKind::Habit => "habit",
            ReminderKind::Wellness => "wellness",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "habit" => Ok(ReminderKind::Habit),
            "wellness" => Ok(ReminderKind::Wellness),
            other => Err(format!("unknown reminder kind: {other}")),
        }
    }
}

/// A persisted reminder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// UUID v4 string — primary key.
    pub id: String,
    /// Owning user. Opaque to the scheduler.
    pub user_id: String,
    /// Message payload delivered by the notifier.
    pub title: String,
    /// Record type this reminder is attached to. Serialised as `type`, the
    /// name the surrounding web layer exchanges.
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    /// Optional habit / wellness-log id; opaque string.
    pub target_id: Option<String>,
    /// When to fire, with the offset the user supplied.
    pub reminder_time: DateTime<FixedOffset>,
    pub repeat: RepeatRule,
    pub state: ReminderState,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a reminder. The store assigns id, state and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReminder {
    pub user_id: String,
    pub title: String,
    pub kind: ReminderKind,
    pub target_id: Option<String>,
    pub reminder_time: DateTime<FixedOffset>,
    pub repeat: RepeatRule,
}
