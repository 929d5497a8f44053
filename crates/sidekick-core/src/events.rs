use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::timer::TimerMode;

/// Every observable state change in the engine produces an Event.
/// The presentation layer subscribes through a [`NotificationSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerTick {
        mode: TimerMode,
        remaining_seconds: u64,
        total_seconds: u64,
        /// 0.0 .. 1.0
        progress: f64,
    },
    TimerPaused {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    /// Always the last event of a run before the timer returns to empty.
    TimerDone {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ReminderFired {
        id: u64,
        text: String,
        at: DateTime<Utc>,
    },
    QuestCompleted {
        id: String,
        reward: u32,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        levels_gained: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Stable event name, identical to the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerTick { .. } => "timer_tick",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::TimerStopped { .. } => "timer_stopped",
            Event::TimerReset { .. } => "timer_reset",
            Event::TimerDone { .. } => "timer_done",
            Event::ReminderFired { .. } => "reminder_fired",
            Event::QuestCompleted { .. } => "quest_completed",
            Event::LevelUp { .. } => "level_up",
        }
    }

    /// Event fields as a JSON map, without the `type` tag.
    pub fn payload(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("type");
                map
            }
            _ => serde_json::Map::new(),
        }
    }
}

/// Receiver of engine events.
///
/// Implementations must not block for long: the timer and reminder loops
/// call `notify` inline (outside their locks).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &Event) -> Result<(), SinkError>;
}

/// Deliver an event, logging instead of propagating sink failures.
pub(crate) fn publish(sink: &dyn NotificationSink, event: Event) {
    if let Err(e) = sink.notify(&event) {
        tracing::warn!(event = event.name(), error = %e, "dropping undeliverable event");
    }
}

/// Buffers events in memory. Handy for tests and for polling front-ends.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.lock().iter().map(Event::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.lock().iter().filter(|e| e.name() == name).count()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, event: &Event) -> Result<(), SinkError> {
        self.lock().push(event.clone());
        Ok(())
    }
}
