//! `wellkit-scheduler` — durable, at-most-once reminder scheduling.
//!
//! # Overview
//!
//! Reminders are persisted to a SQLite `reminders` table. The
//! [`engine::ReminderEngine`] arms one Tokio timer task per scheduled
//! reminder and fires it at `reminder_time`; on startup, [`recover`]
//! re-derives the armed set from the store, so no in-memory state needs to
//! survive a restart.
//!
//! Every transition out of `scheduled` is a conditional write
//! (`UPDATE … WHERE state = 'scheduled'`). A firing that loses that write to
//! a concurrent cancel or reschedule becomes a silent no-op and the notifier
//! is never invoked — that conditional write, not the in-memory disarm, is
//! what guarantees at-most-one delivery per reminder instance.
//!
//! # Repeat rules
//!
//! | Rule     | Behaviour after firing                                  |
//! |----------|---------------------------------------------------------|
//! | `none`   | State becomes `fired`; terminal                         |
//! | `daily`  | `reminder_time` += 1 day (local wall-clock), re-armed   |
//! | `weekly` | `reminder_time` += 7 days (local wall-clock), re-armed  |
//!
//! Occurrences missed while the process was down are skipped, never
//! back-filled: the expander advances straight to the first strictly-future
//! occurrence.
//!
//! [`recover`]: engine::ReminderEngine::recover

pub mod control;
pub mod db;
pub mod engine;
pub mod error;
pub mod repeat;
pub mod store;

pub use control::{JobControl, ScheduleRequest};
pub use engine::ReminderEngine;
pub use error::{Result, SchedulerError};
pub use store::ReminderStore;
