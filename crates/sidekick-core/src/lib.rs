//! # Sidekick Core Library
//!
//! This library provides the session engine behind the Sidekick assistant.
//! All state lives in explicit objects owned by a [`SessionEngine`]; there are
//! no process-wide singletons, so tests can build as many independent
//! engines as they like.
//!
//! ## Architecture
//!
//! - **Timer Worker**: a single shared countdown behind one mutex, stepped
//!   once per second by a background task
//! - **Reminder Scheduler**: one-shot reminders polled every few seconds
//! - **Gamification Ledger**: XP, levels, mode multiplier and daily quests
//! - **Dialogue Engine**: an ordered chain of handlers plus a persona
//!   decoration pass
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerWorker`]: countdown state machine
//! - [`ReminderScheduler`]: time-triggered reminders
//! - [`Ledger`]: level/XP record with the daily quest block
//! - [`DialogueEngine`]: turns one line of input into a reply
//! - [`SessionEngine`]: wires everything together

pub mod chance;
pub mod checklist;
pub mod clock;
pub mod dialogue;
pub mod engine;
pub mod error;
pub mod events;
pub mod game;
pub mod reminders;
pub mod storage;
pub mod timer;

pub use chance::{Chance, FixedChance, SeededChance, ThreadChance};
pub use checklist::{Checklist, ChecklistItem};
pub use clock::{Clock, ManualClock, SystemClock};
pub use dialogue::{
    CommandDispatcher, DialogueEngine, DirKnowledgeBase, KnowledgeBase, Profile, Response,
    SessionContext,
};
pub use engine::SessionEngine;
pub use error::{ConfigError, CoreError, DialogueError, SinkError, StorageError};
pub use events::{Event, MemorySink, NotificationSink};
pub use game::{CounterKind, DailyBlock, GameState, Ledger, Mode, XpAward, XpKind};
pub use reminders::{Reminder, ReminderScheduler};
pub use storage::{Config, Database, KvStore, MemoryStore, ProfileStore};
pub use timer::{TimerMode, TimerState, TimerWorker};
