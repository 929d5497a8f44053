//! Timer worker implementation.
//!
//! One shared countdown guarded by a single mutex. The worker has no thread
//! of its own: [`TimerWorker::tick`] advances it by one second and
//! [`TimerWorker::spawn`] calls `tick` once per second on a tokio task.
//!
//! ## State Transitions
//!
//! ```text
//! Empty -> Running <-> Paused
//!   ^         |
//!   +- done --+  (also via stop)
//! ```
//!
//! Events are always published after the lock is released, so a failing
//! sink or completion hook can never leave the countdown half-updated.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::state::{TimerMode, TimerState};
use crate::clock::Clock;
use crate::events::{publish, Event, NotificationSink};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Called once for every countdown that reaches zero.
pub trait CompletionHook: Send + Sync {
    fn timer_completed(&self, mode: TimerMode);
}

/// What a single [`TimerWorker::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: empty or paused.
    Idle,
    Running { remaining_seconds: u64 },
    Completed { mode: TimerMode },
}

struct Inner {
    state: TimerState,
    /// Bumped by every start/reset/stop so a completion only clears the run
    /// that actually finished.
    generation: u64,
}

pub struct TimerWorker {
    inner: Mutex<Inner>,
    sink: Arc<dyn NotificationSink>,
    on_complete: Option<Arc<dyn CompletionHook>>,
    clock: Arc<dyn Clock>,
    default_seconds: u64,
    default_mode: TimerMode,
}

impl TimerWorker {
    pub fn new(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: TimerState::empty(),
                generation: 0,
            }),
            sink,
            on_complete: None,
            clock,
            default_seconds: 25 * 60,
            default_mode: TimerMode::Focus,
        }
    }

    pub fn with_completion_hook(mut self, hook: Arc<dyn CompletionHook>) -> Self {
        self.on_complete = Some(hook);
        self
    }

    /// Duration and mode used by `reset()` when no timer ever ran.
    pub fn with_defaults(mut self, seconds: u64, mode: TimerMode) -> Self {
        self.default_seconds = seconds.max(1);
        self.default_mode = mode;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerState {
        self.lock().state.clone()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new countdown, replacing whatever was running.
    pub fn start(&self, seconds: u64, mode: TimerMode) -> TimerState {
        let seconds = seconds.max(1);
        let now = self.clock.now();
        let snapshot = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = TimerState {
                mode: Some(mode),
                total_seconds: seconds,
                remaining_seconds: seconds,
                active: true,
                paused: false,
                started_at: Some(now),
            };
            inner.state.clone()
        };
        tracing::debug!(%mode, seconds, "timer started");
        publish(
            self.sink.as_ref(),
            Event::TimerStarted {
                mode,
                total_seconds: seconds,
                at: now,
            },
        );
        self.publish_tick(&snapshot);
        snapshot
    }

    /// Returns true if a running timer was paused.
    pub fn pause(&self) -> bool {
        let remaining = {
            let mut inner = self.lock();
            if !inner.state.active || inner.state.paused {
                return false;
            }
            inner.state.paused = true;
            inner.state.remaining_seconds
        };
        publish(
            self.sink.as_ref(),
            Event::TimerPaused {
                remaining_seconds: remaining,
                at: self.clock.now(),
            },
        );
        true
    }

    /// Returns true if a paused timer was resumed.
    pub fn resume(&self) -> bool {
        let remaining = {
            let mut inner = self.lock();
            if !inner.state.active || !inner.state.paused {
                return false;
            }
            inner.state.paused = false;
            inner.state.remaining_seconds
        };
        publish(
            self.sink.as_ref(),
            Event::TimerResumed {
                remaining_seconds: remaining,
                at: self.clock.now(),
            },
        );
        true
    }

    pub fn stop(&self) {
        {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = TimerState::empty();
        }
        tracing::debug!("timer stopped");
        publish(self.sink.as_ref(), Event::TimerStopped { at: self.clock.now() });
    }

    /// Restart with the previous duration and mode, or the defaults if no
    /// timer has run yet.
    pub fn reset(&self) -> TimerState {
        let now = self.clock.now();
        let snapshot = {
            let mut inner = self.lock();
            let (total, mode) = match (inner.state.total_seconds, inner.state.mode) {
                (total, Some(mode)) if total > 0 => (total, mode),
                _ => (self.default_seconds, self.default_mode),
            };
            inner.generation += 1;
            inner.state = TimerState {
                mode: Some(mode),
                total_seconds: total,
                remaining_seconds: total,
                active: true,
                paused: false,
                started_at: Some(now),
            };
            inner.state.clone()
        };
        let mode = snapshot.mode.unwrap_or(self.default_mode);
        publish(
            self.sink.as_ref(),
            Event::TimerReset {
                mode,
                total_seconds: snapshot.total_seconds,
                at: now,
            },
        );
        self.publish_tick(&snapshot);
        snapshot
    }

    /// Advance the countdown by one second.
    pub fn tick(&self) -> TickOutcome {
        let (snapshot, generation) = {
            let mut inner = self.lock();
            let st = &mut inner.state;
            if !st.is_running() || st.remaining_seconds == 0 {
                return TickOutcome::Idle;
            }
            st.remaining_seconds -= 1;
            (inner.state.clone(), inner.generation)
        };

        self.publish_tick(&snapshot);
        if snapshot.remaining_seconds > 0 {
            return TickOutcome::Running {
                remaining_seconds: snapshot.remaining_seconds,
            };
        }

        let mode = snapshot.mode.unwrap_or(self.default_mode);
        tracing::debug!(%mode, "timer done");
        publish(
            self.sink.as_ref(),
            Event::TimerDone {
                mode,
                at: self.clock.now(),
            },
        );
        if let Some(hook) = &self.on_complete {
            hook.timer_completed(mode);
        }

        let mut inner = self.lock();
        if inner.generation == generation {
            inner.generation += 1;
            inner.state = TimerState::empty();
        }
        TickOutcome::Completed { mode }
    }

    /// Run `tick` once per second until the runtime shuts down.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let worker = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(TICK_INTERVAL).await;
                worker.tick();
            }
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish_tick(&self, snapshot: &TimerState) {
        let Some(mode) = snapshot.mode else {
            return;
        };
        publish(
            self.sink.as_ref(),
            Event::TimerTick {
                mode,
                remaining_seconds: snapshot.remaining_seconds,
                total_seconds: snapshot.total_seconds,
                progress: snapshot.progress(),
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is only ever replaced wholesale, so a poisoned guard is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
