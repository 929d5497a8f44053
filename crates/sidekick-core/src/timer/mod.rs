mod state;
mod worker;

pub use state::{TimerMode, TimerState};
pub use worker::{CompletionHook, TickOutcome, TimerWorker, TICK_INTERVAL};
