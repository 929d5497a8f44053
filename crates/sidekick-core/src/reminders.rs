//! One-shot, time-triggered reminders.
//!
//! A reminder fires at most once: [`ReminderScheduler::poll`] removes every
//! due reminder whether or not the sink accepted the event. Pending
//! reminders are written to the key-value store on every change.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::events::{publish, Event, NotificationSink};
use crate::storage::{load_json, save_json, KvStore};

pub const REMINDERS_KEY: &str = "reminders";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub text: String,
    pub fires_at: DateTime<Utc>,
}

struct Pending {
    reminders: Vec<Reminder>,
    next_id: u64,
}

pub struct ReminderScheduler {
    pending: Mutex<Pending>,
    store: Arc<dyn KvStore>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl ReminderScheduler {
    pub fn open(
        store: Arc<dyn KvStore>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Self {
        let reminders: Vec<Reminder> = match load_json(store.as_ref(), REMINDERS_KEY) {
            Ok(found) => found.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable reminders, starting empty");
                Vec::new()
            }
        };
        let next_id = reminders.iter().map(|r| r.id).max().map_or(1, |id| id + 1);
        Self {
            pending: Mutex::new(Pending { reminders, next_id }),
            store,
            sink,
            clock,
            poll_interval,
        }
    }

    pub fn add(&self, text: impl Into<String>, fires_at: DateTime<Utc>) -> u64 {
        let mut pending = self.lock();
        let id = pending.next_id;
        pending.next_id += 1;
        pending.reminders.push(Reminder {
            id,
            text: text.into(),
            fires_at,
        });
        self.persist(&pending.reminders);
        tracing::debug!(id, %fires_at, "reminder added");
        id
    }

    /// Returns whether a reminder with `id` was pending.
    pub fn remove(&self, id: u64) -> bool {
        let mut pending = self.lock();
        let before = pending.reminders.len();
        pending.reminders.retain(|r| r.id != id);
        let removed = pending.reminders.len() != before;
        if removed {
            self.persist(&pending.reminders);
        }
        removed
    }

    pub fn list(&self) -> Vec<Reminder> {
        self.lock().reminders.clone()
    }

    /// Fire and remove every reminder that is due. Returns what fired.
    pub fn poll(&self) -> Vec<Reminder> {
        let now = self.clock.now();
        let due: Vec<Reminder> = self
            .list()
            .into_iter()
            .filter(|r| r.fires_at <= now)
            .collect();

        for reminder in &due {
            publish(
                self.sink.as_ref(),
                Event::ReminderFired {
                    id: reminder.id,
                    text: reminder.text.clone(),
                    at: now,
                },
            );
            self.remove(reminder.id);
        }
        if !due.is_empty() {
            tracing::debug!(count = due.len(), "reminders fired");
        }
        due
    }

    /// Poll forever, sleeping the configured interval between passes.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                scheduler.poll();
                tokio::time::sleep(scheduler.poll_interval).await;
            }
        })
    }

    fn persist(&self, reminders: &[Reminder]) {
        if let Err(e) = save_json(self.store.as_ref(), REMINDERS_KEY, reminders) {
            tracing::warn!(error = %e, "failed to persist reminders");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
