//! Timer engine — arms one deferred task per scheduled reminder.
//!
//! Per-reminder lifecycle: Unarmed → Armed → Firing → {Rearmed | Terminal}.
//! The armed set lives in a DashMap keyed by reminder id; it is derived from
//! the store and rebuilt by [`ReminderEngine::recover`] after a restart.
//! Disarm is best-effort preemption — a timer task that already dequeued can
//! still reach the store, where the conditional write turns the late firing
//! into a no-op.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use futures_util::FutureExt;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

use wellkit_core::reminder::{Reminder, ReminderState, RepeatRule};
use wellkit_notify::Notifier;

use crate::error::SchedulerError;
use crate::repeat;
use crate::store::ReminderStore;

struct ArmedTimer {
    /// Monotonic arm counter. A firing only removes its own registration, so
    /// a re-arm that replaced this entry is never clobbered by the old task.
    generation: u64,
    abort: AbortHandle,
}

/// Arms, fires and disarms reminder timers. Cheap to clone; all clones share
/// the same registry and store.
#[derive(Clone)]
pub struct ReminderEngine {
    store: ReminderStore,
    notifier: Arc<dyn Notifier>,
    timers: Arc<DashMap<String, ArmedTimer>>,
    generation: Arc<AtomicU64>,
}

impl ReminderEngine {
    pub fn new(store: ReminderStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            timers: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Arm a timer for `reminder`. Replaces (and aborts) any previous timer
    /// for the same id. A past-due `reminder_time` fires immediately.
    pub fn arm(&self, reminder: &Reminder) {
        if reminder.state != ReminderState::Scheduled {
            self.disarm(&reminder.id);
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let delay = (reminder.reminder_time.with_timezone(&Utc) - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        // The task waits for its registration before sleeping, so the map
        // entry is in place before fire() tries to remove it.
        let (registered_tx, registered_rx) = oneshot::channel::<()>();
        let engine = self.clone();
        let id = reminder.id.clone();
        let handle = tokio::spawn(async move {
            let _ = registered_rx.await;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            engine.fire(&id, generation).await;
        });

        let previous = self.timers.insert(
            reminder.id.clone(),
            ArmedTimer {
                generation,
                abort: handle.abort_handle(),
            },
        );
        if let Some(old) = previous {
            old.abort.abort();
        }
        let _ = registered_tx.send(());

        debug!(
            reminder_id = %reminder.id,
            due = %reminder.reminder_time.to_rfc3339(),
            delay_ms = delay.as_millis() as u64,
            "timer armed"
        );
    }

    /// Cancel the pending timer for `id`, if any. No-op when the id is
    /// unknown or the timer already started firing — the store's conditional
    /// write is the real arbiter in that race.
    pub fn disarm(&self, id: &str) {
        if let Some((_, timer)) = self.timers.remove(id) {
            timer.abort.abort();
            debug!(reminder_id = %id, "timer disarmed");
        }
    }

    /// Re-derive the armed set from the store. Run once at startup; this is
    /// what makes scheduling durable across restarts.
    pub fn recover(&self) -> crate::error::Result<usize> {
        let pending = self.store.list_pending()?;
        let count = pending.len();
        for reminder in &pending {
            self.arm(reminder);
        }
        info!(count, "recovered pending reminders");
        Ok(count)
    }

    /// Abort every armed timer. The store is untouched, so a later
    /// `recover()` picks everything back up.
    pub fn shutdown(&self) {
        let ids: Vec<String> = self.timers.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            self.disarm(&id);
        }
        info!("reminder engine shut down");
    }

    /// Number of currently armed timers.
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Called by a timer task when its deadline arrives. Every outcome is
    /// decided by a conditional write; on Conflict the firing is silent and
    /// the notifier is never invoked.
    async fn fire(&self, id: &str, generation: u64) {
        // Armed → Firing: drop our own registration (and only ours).
        self.timers.remove_if(id, |_, t| t.generation == generation);

        let reminder = match self.store.get(id) {
            Ok(r) => r,
            Err(SchedulerError::NotFound { .. }) => return,
            Err(e) => {
                error!(reminder_id = %id, "firing aborted, store read failed: {e}");
                return;
            }
        };
        if reminder.state != ReminderState::Scheduled {
            return;
        }

        let fired_at = Utc::now();
        if reminder.reminder_time > fired_at {
            // A reschedule moved the deadline while this timer was already
            // dequeued. Hand the reminder to a fresh timer instead of firing.
            self.arm(&reminder);
            return;
        }

        match reminder.repeat {
            RepeatRule::None => match self.store.mark_fired(id, reminder.reminder_time) {
                Ok(()) => self.deliver(&reminder).await,
                Err(SchedulerError::Conflict { .. }) => {
                    debug!(reminder_id = %id, "firing lost the state race — skipping delivery");
                }
                Err(SchedulerError::NotFound { .. }) => {}
                Err(e) => error!(reminder_id = %id, "mark_fired failed: {e}"),
            },
            rule => {
                let Some(next) = repeat::next_after(reminder.reminder_time, rule, fired_at) else {
                    return;
                };
                match self.store.advance_occurrence(id, reminder.reminder_time, next) {
                    Ok(()) => {
                        self.deliver(&reminder).await;
                        let mut rearmed = reminder;
                        rearmed.reminder_time = next;
                        self.arm(&rearmed);
                    }
                    Err(SchedulerError::Conflict { .. }) => {
                        debug!(reminder_id = %id, "firing lost the state race — skipping delivery");
                    }
                    Err(SchedulerError::NotFound { .. }) => {}
                    Err(e) => error!(reminder_id = %id, "advance_occurrence failed: {e}"),
                }
            }
        }
    }

    /// One delivery attempt. Failures are logged and never retried; a panic
    /// inside a notifier backend is contained here so every other armed
    /// timer keeps running.
    async fn deliver(&self, reminder: &Reminder) {
        let fired_at = Utc::now();
        let attempt = AssertUnwindSafe(self.notifier.notify(
            &reminder.user_id,
            &reminder.title,
            fired_at,
        ))
        .catch_unwind();

        match attempt.await {
            Ok(Ok(())) => info!(
                reminder_id = %reminder.id,
                user_id = %reminder.user_id,
                backend = self.notifier.name(),
                "reminder delivered"
            ),
            Ok(Err(e)) => warn!(
                reminder_id = %reminder.id,
                user_id = %reminder.user_id,
                "delivery failed (not retried): {e}"
            ),
            Err(_) => error!(
                reminder_id = %reminder.id,
                backend = self.notifier.name(),
                "notifier panicked during delivery"
            ),
        }
    }
}
