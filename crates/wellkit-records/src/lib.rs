//! `wellkit-records` — habit and wellness-log record stores.
//!
//! Plain request/response persistence with no concurrency or ordering
//! hazard: the scheduler only ever references these records through an
//! opaque `target_id`, and nothing here arms timers. Auth, validation and
//! HTTP live in the web layer above this crate.

pub mod analytics;
pub mod db;
pub mod error;
pub mod habits;
pub mod types;
pub mod wellness;

pub use analytics::{
    habit_consistency, progress_summary, wellness_trends, HabitConsistency, ProgressSummary,
    WellnessTrends,
};
pub use error::{RecordError, Result};
pub use habits::HabitStore;
pub use types::{Habit, HabitFrequency, WellnessLog, WellnessLogUpdate};
pub use wellness::WellnessStore;
