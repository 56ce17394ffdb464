use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How often a habit is meant to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HabitFrequency::Daily => "daily",
            HabitFrequency::Weekly => "weekly",
            HabitFrequency::Monthly => "monthly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for HabitFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "daily" => Ok(HabitFrequency::Daily),
            "weekly" => Ok(HabitFrequency::Weekly),
            "monthly" => Ok(HabitFrequency::Monthly),
            other => Err(format!("unknown habit frequency: {other}")),
        }
    }
}

/// A user-defined habit. Reminders link to it via `target_id = habit.id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// UUID v4 string — primary key.
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub frequency: HabitFrequency,
    pub created_at: DateTime<Utc>,
}

/// One daily wellness entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessLog {
    pub id: String,
    pub user_id: String,
    pub sleep_hours: f64,
    pub water_intake_liters: f64,
    pub steps: i64,
    pub mood: Option<String>,
    /// Calendar day the entry describes.
    pub date: NaiveDate,
}

/// Partial update — `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellnessLogUpdate {
    pub sleep_hours: Option<f64>,
    pub water_intake_liters: Option<f64>,
    pub steps: Option<i64>,
    pub mood: Option<String>,
}
