//! Read-only aggregate reports over habits and wellness logs.
//!
//! Pure consumers of the two stores; nothing here writes. The window end is
//! an explicit `as_of` date so reports are deterministic — the web layer
//! passes today.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::habits::HabitStore;
use crate::types::{HabitFrequency, WellnessLog};
use crate::wellness::WellnessStore;

/// How many of the most recent mood entries a trend report carries.
const MOOD_TRAIL_LEN: usize = 7;

/// Per-habit completion rate over a trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct HabitConsistency {
    pub habit_id: String,
    pub habit_name: String,
    pub frequency: HabitFrequency,
    /// Days inside the window with a logged completion.
    pub completed_days: usize,
    /// `completed_days / window_days`, as a percentage rounded to 2 dp.
    pub consistency_percent: f64,
}

/// Averages over a trailing window of wellness logs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WellnessTrends {
    pub average_sleep: f64,
    pub average_steps: f64,
    pub average_water_intake: f64,
    /// The most recent mood entries, oldest first.
    pub mood_trend: Vec<String>,
}

/// Where the user stands today.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub total_habits: usize,
    pub habits_completed_today: usize,
    pub wellness_today: Option<WellnessLog>,
}

/// Completion rate per habit over the `window_days` ending at `as_of`.
pub fn habit_consistency(
    habits: &HabitStore,
    user_id: &str,
    window_days: u32,
    as_of: NaiveDate,
) -> Result<Vec<HabitConsistency>> {
    let start = as_of - Duration::days(window_days as i64);
    let mut report = Vec::new();

    for habit in habits.list_for_user(user_id)? {
        let completed_days = habits
            .completions(&habit.id)?
            .into_iter()
            .filter(|d| *d >= start && *d <= as_of)
            .count();
        let consistency = if window_days == 0 {
            0.0
        } else {
            completed_days as f64 / window_days as f64 * 100.0
        };
        report.push(HabitConsistency {
            habit_id: habit.id,
            habit_name: habit.name,
            frequency: habit.frequency,
            completed_days,
            consistency_percent: round2(consistency),
        });
    }
    Ok(report)
}

/// Sleep/steps/water averages plus the recent mood trail over the
/// `window_days` ending at `as_of`. All zeroes when no log falls inside
/// the window.
pub fn wellness_trends(
    wellness: &WellnessStore,
    user_id: &str,
    window_days: u32,
    as_of: NaiveDate,
) -> Result<WellnessTrends> {
    let start = as_of - Duration::days(window_days as i64);
    let mut logs = wellness.list_for_user(user_id)?;
    logs.retain(|l| l.date >= start && l.date <= as_of);
    if logs.is_empty() {
        return Ok(WellnessTrends::default());
    }
    // list_for_user is newest-first; the mood trail reads oldest-first.
    logs.reverse();

    let n = logs.len() as f64;
    let sleep: f64 = logs.iter().map(|l| l.sleep_hours).sum();
    let water: f64 = logs.iter().map(|l| l.water_intake_liters).sum();
    let steps: f64 = logs.iter().map(|l| l.steps as f64).sum();

    let moods: Vec<String> = logs.iter().filter_map(|l| l.mood.clone()).collect();
    let mood_trend = moods[moods.len().saturating_sub(MOOD_TRAIL_LEN)..].to_vec();

    Ok(WellnessTrends {
        average_sleep: round2(sleep / n),
        average_steps: round2(steps / n),
        average_water_intake: round2(water / n),
        mood_trend,
    })
}

/// Habit count, completions logged for `today`, and today's wellness entry.
pub fn progress_summary(
    habits: &HabitStore,
    wellness: &WellnessStore,
    user_id: &str,
    today: NaiveDate,
) -> Result<ProgressSummary> {
    Ok(ProgressSummary {
        total_habits: habits.list_for_user(user_id)?.len(),
        habits_completed_today: habits.completed_count_on(user_id, today)?,
        wellness_today: wellness.log_for_date(user_id, today)?,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn habit_store() -> HabitStore {
        HabitStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn wellness_store() -> WellnessStore {
        WellnessStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn consistency_counts_only_the_window() {
        let habits = habit_store();
        let habit = habits
            .create("u-1", "morning run", HabitFrequency::Daily)
            .unwrap();

        for d in ["2025-10-05", "2025-10-20", "2025-10-30"] {
            habits.log_completion(&habit.id, day(d)).unwrap();
        }
        // Well outside a 30-day window ending 2025-10-31.
        habits.log_completion(&habit.id, day("2025-08-01")).unwrap();

        let report = habit_consistency(&habits, "u-1", 30, day("2025-10-31")).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].habit_name, "morning run");
        assert_eq!(report[0].completed_days, 3);
        assert_eq!(report[0].consistency_percent, 10.0);
    }

    #[test]
    fn consistency_reports_every_habit_even_without_completions() {
        let habits = habit_store();
        habits.create("u-1", "journal", HabitFrequency::Daily).unwrap();
        habits
            .create("u-1", "long walk", HabitFrequency::Weekly)
            .unwrap();

        let report = habit_consistency(&habits, "u-1", 30, day("2025-10-31")).unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|h| h.completed_days == 0));
        assert!(report.iter().all(|h| h.consistency_percent == 0.0));
    }

    #[test]
    fn trends_average_over_the_window() {
        let wellness = wellness_store();
        wellness
            .create("u-1", 6.0, 1.5, 4000, Some("tired"), day("2025-10-20"))
            .unwrap();
        wellness
            .create("u-1", 8.0, 2.5, 8000, Some("rested"), day("2025-10-21"))
            .unwrap();
        // Outside the window — must not skew the averages.
        wellness
            .create("u-1", 2.0, 0.5, 100, Some("awful"), day("2025-08-01"))
            .unwrap();

        let trends = wellness_trends(&wellness, "u-1", 30, day("2025-10-31")).unwrap();
        assert_eq!(trends.average_sleep, 7.0);
        assert_eq!(trends.average_steps, 6000.0);
        assert_eq!(trends.average_water_intake, 2.0);
        assert_eq!(trends.mood_trend, vec!["tired", "rested"]);
    }

    #[test]
    fn trends_with_no_logs_are_all_zero() {
        let trends =
            wellness_trends(&wellness_store(), "u-1", 30, day("2025-10-31")).unwrap();
        assert_eq!(trends.average_sleep, 0.0);
        assert_eq!(trends.average_steps, 0.0);
        assert!(trends.mood_trend.is_empty());
    }

    #[test]
    fn mood_trail_keeps_the_last_seven() {
        let wellness = wellness_store();
        for i in 1..=9 {
            let mood = format!("m{i}");
            wellness
                .create(
                    "u-1",
                    7.0,
                    2.0,
                    5000,
                    Some(mood.as_str()),
                    day(&format!("2025-10-{i:02}")),
                )
                .unwrap();
        }

        let trends = wellness_trends(&wellness, "u-1", 30, day("2025-10-31")).unwrap();
        assert_eq!(
            trends.mood_trend,
            vec!["m3", "m4", "m5", "m6", "m7", "m8", "m9"]
        );
    }

    #[test]
    fn summary_reflects_today_only() {
        let habits = habit_store();
        let wellness = wellness_store();
        let today = day("2025-10-21");

        let run = habits.create("u-1", "run", HabitFrequency::Daily).unwrap();
        habits.create("u-1", "read", HabitFrequency::Daily).unwrap();
        habits.log_completion(&run.id, today).unwrap();
        habits.log_completion(&run.id, day("2025-10-20")).unwrap();
        wellness
            .create("u-1", 7.5, 2.0, 9000, None, today)
            .unwrap();

        let summary = progress_summary(&habits, &wellness, "u-1", today).unwrap();
        assert_eq!(summary.total_habits, 2);
        assert_eq!(summary.habits_completed_today, 1);
        assert_eq!(summary.wellness_today.unwrap().steps, 9000);
    }

    #[test]
    fn summary_without_wellness_log_is_none() {
        let summary = progress_summary(
            &habit_store(),
            &wellness_store(),
            "u-1",
            day("2025-10-21"),
        )
        .unwrap();
        assert_eq!(summary.total_habits, 0);
        assert_eq!(summary.habits_completed_today, 0);
        assert!(summary.wellness_today.is_none());
    }
}
