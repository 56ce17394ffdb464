//! Job-control façade — the narrow surface the surrounding CRUD layer uses.
//!
//! All inbound timestamps and rule names arrive as strings and are parsed
//! here, before anything touches the store; everything past this boundary
//! works on typed, zone-aware values. Repeated identical calls are
//! idempotent: cancelling an already-terminal reminder or rescheduling to
//! the same time twice is a no-op, never an error.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use wellkit_core::reminder::{NewReminder, Reminder, ReminderState};

use crate::engine::ReminderEngine;
use crate::error::{Result, SchedulerError};
use crate::store::ReminderStore;

/// Inbound schedule request, as the CRUD layer hands it over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub user_id: String,
    pub title: String,
    /// `"habit"` or `"wellness"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque habit / wellness-log reference.
    pub target_id: Option<String>,
    /// RFC3339 with offset, e.g. `2025-10-21T15:30:00+05:30`.
    pub reminder_time: String,
    /// `"none"` (default), `"daily"` or `"weekly"`.
    pub repeat: Option<String>,
}

/// Schedule / cancel / reschedule / query, backed by the store with the
/// engine kept in lockstep.
#[derive(Clone)]
pub struct JobControl {
    store: ReminderStore,
    engine: ReminderEngine,
}

impl JobControl {
    pub fn new(store: ReminderStore, engine: ReminderEngine) -> Self {
        Self { store, engine }
    }

    /// Validate, persist and arm a new reminder. Parse failures reject the
    /// request before any store write. Identical requests are never
    /// deduplicated — each call creates an independent reminder.
    pub fn schedule(&self, req: ScheduleRequest) -> Result<Reminder> {
        let reminder_time = DateTime::parse_from_rfc3339(&req.reminder_time).map_err(|e| {
            SchedulerError::InvalidSchedule(format!(
                "unparsable reminder_time {:?}: {e}",
                req.reminder_time
            ))
        })?;
        let repeat = match req.repeat.as_deref() {
            None => Default::default(),
            Some(s) => s.parse().map_err(SchedulerError::InvalidSchedule)?,
        };
        let kind = req.kind.parse().map_err(SchedulerError::InvalidSchedule)?;

        let reminder = self.store.create(NewReminder {
            user_id: req.user_id,
            title: req.title,
            kind,
            target_id: req.target_id,
            reminder_time,
            repeat,
        })?;
        self.engine.arm(&reminder);

        info!(
            reminder_id = %reminder.id,
            user_id = %reminder.user_id,
            due = %reminder.reminder_time.to_rfc3339(),
            repeat = %reminder.repeat,
            "reminder scheduled"
        );
        Ok(reminder)
    }

    /// Move a scheduled reminder to `new_time` (RFC3339) and re-arm it.
    /// No-op if the reminder already fired or was cancelled; only an unknown
    /// id is an error.
    pub fn reschedule(&self, id: &str, new_time: &str) -> Result<()> {
        let new_time = DateTime::parse_from_rfc3339(new_time).map_err(|e| {
            SchedulerError::InvalidSchedule(format!("unparsable reminder_time {new_time:?}: {e}"))
        })?;

        match self.store.update_time(id, new_time) {
            Ok(()) => {
                let reminder = self.store.get(id)?;
                self.engine.arm(&reminder);
                info!(reminder_id = %id, due = %new_time.to_rfc3339(), "reminder rescheduled");
                Ok(())
            }
            // Already fired or cancelled — repeated/late reschedules are
            // no-ops by contract.
            Err(SchedulerError::Conflict { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Cancel a reminder and disarm its timer. Cancelling an already-fired
    /// or already-cancelled reminder is a no-op and never un-fires it.
    pub fn cancel(&self, id: &str) -> Result<()> {
        let result = self.store.cancel(id);
        // Best-effort preemption either way; if the timer already began
        // firing, the conditional write above has decided the outcome.
        self.engine.disarm(id);

        match result {
            Ok(()) => {
                info!(reminder_id = %id, "reminder cancelled");
                Ok(())
            }
            Err(SchedulerError::Conflict { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, id: &str) -> Result<Reminder> {
        self.store.get(id)
    }

    pub fn get_status(&self, id: &str) -> Result<ReminderState> {
        Ok(self.store.get(id)?.state)
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<Reminder>> {
        self.store.list_for_user(user_id)
    }
}
