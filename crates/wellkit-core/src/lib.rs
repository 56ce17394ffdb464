//! `wellkit-core` — shared types and configuration for the wellkit service.
//!
//! Holds the reminder model used by the scheduler engine, the job-control
//! façade and the notifier backends, plus figment-based config loading.

pub mod config;
pub mod error;
pub mod reminder;

pub use error::{CoreError, Result};
pub use reminder::{NewReminder, Reminder, ReminderKind, ReminderState, RepeatRule};
