//! Application context.
//!
//! [`SessionEngine`] owns exactly one of each component and wires them
//! together: the timer's completion hook feeds the ledger's daily quests,
//! checklist completions do the same, and every message is counted and
//! scanned for XP hints before it reaches the dialogue engine.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::task::JoinHandle;

use crate::checklist::Checklist;
use crate::clock::Clock;
use crate::dialogue::{CommandDispatcher, DialogueEngine, Response, SessionContext};
use crate::events::NotificationSink;
use crate::game::{CounterKind, GameState, Ledger, Mode, XpAward, XpKind};
use crate::reminders::ReminderScheduler;
use crate::storage::{Config, KvStore, ProfileStore};
use crate::timer::{CompletionHook, TimerWorker};

static STUDY_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:study|studying|homework|exam|revise|revision|math|physics)\b").unwrap()
});
static CODING_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:code|coding|program|programming|debug|python|javascript|java)\b")
        .unwrap()
});

pub struct SessionEngine {
    config: Config,
    ledger: Arc<Ledger>,
    timer: Arc<TimerWorker>,
    reminders: Arc<ReminderScheduler>,
    checklist: Checklist,
    dialogue: DialogueEngine,
    profiles: Arc<dyn ProfileStore>,
}

impl SessionEngine {
    /// Build every component on top of one store. Profiles live in the
    /// same store unless [`with_profile_store`](Self::with_profile_store)
    /// replaces them.
    pub fn new<S: KvStore + 'static>(
        config: Config,
        store: Arc<S>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let kv: Arc<dyn KvStore> = store.clone();
        let profiles: Arc<dyn ProfileStore> = store;

        let ledger = Arc::new(Ledger::open(kv.clone(), sink.clone(), clock.clone()));
        let timer = TimerWorker::new(sink.clone(), clock.clone())
            .with_defaults(config.timer.default_seconds, config.timer.default_mode)
            .with_completion_hook(ledger.clone() as Arc<dyn CompletionHook>);
        let reminders = ReminderScheduler::open(
            kv.clone(),
            sink,
            clock.clone(),
            config.reminders.poll_interval(),
        );
        let checklist = Checklist::open(kv, ledger.clone(), clock.clone());
        let dialogue = DialogueEngine::new(&config.dialogue, clock);

        Self {
            config,
            ledger,
            timer: Arc::new(timer),
            reminders: Arc::new(reminders),
            checklist,
            dialogue,
            profiles,
        }
    }

    pub fn with_profile_store(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        self.dialogue = self.dialogue.with_dispatcher(dispatcher);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn timer(&self) -> &Arc<TimerWorker> {
        &self.timer
    }

    pub fn reminders(&self) -> &Arc<ReminderScheduler> {
        &self.reminders
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    // ── Gamification ─────────────────────────────────────────────────

    pub fn add_xp(&self, kind: &str, amount: i64) -> XpAward {
        self.ledger.add_xp(XpKind::parse(kind), amount)
    }

    pub fn game_state(&self) -> GameState {
        self.ledger.game_state()
    }

    pub fn set_mode(&self, mode: &str) -> Mode {
        self.ledger.set_mode(mode)
    }

    // ── Dialogue ─────────────────────────────────────────────────────

    /// Answer one line from the user identified by `profile_key`.
    ///
    /// The command counter and XP hints apply before the dialogue runs, so
    /// they count even when only the fallback answers.
    pub fn handle_message(
        &self,
        profile_key: &str,
        text: &str,
        session: &mut SessionContext,
    ) -> Response {
        self.ledger.bump_counter(CounterKind::CommandIssued);
        self.apply_hints(text);

        let mut profile = self.profiles.get(profile_key);
        let response = self.dialogue.respond(text, &mut profile, session);
        if let Some(updated) = &response.updated_profile {
            if let Err(e) = self.profiles.set(profile_key, updated) {
                tracing::warn!(profile = profile_key, error = %e, "failed to persist profile");
            }
        }
        response
    }

    fn apply_hints(&self, text: &str) {
        let hints = &self.config.hints;
        if STUDY_HINT_RE.is_match(text) {
            self.ledger.add_xp(XpKind::Study, hints.study_xp);
        }
        if CODING_HINT_RE.is_match(text) {
            self.ledger.add_xp(XpKind::Coding, hints.coding_xp);
        }
    }

    // ── Background ───────────────────────────────────────────────────

    /// Start the timer and reminder loops on the current tokio runtime.
    pub fn spawn_background(&self) -> Vec<JoinHandle<()>> {
        vec![self.timer.spawn(), self.reminders.spawn()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;
    use crate::clock::ManualClock;
    use crate::dialogue::Profile;
    use crate::events::MemorySink;
    use crate::storage::MemoryStore;
    use crate::timer::TimerMode;
    use chrono::{TimeZone, Utc};

    fn engine() -> (SessionEngine, Arc<MemoryStore>, Arc<MemorySink>) {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(MemorySink::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        ));
        let engine = SessionEngine::new(Config::default(), store.clone(), sink.clone(), clock);
        (engine, store, sink)
    }

    fn quiet() -> SessionContext {
        SessionContext::with_chance(Box::new(FixedChance::never()))
    }

    #[test]
    fn every_message_counts_as_a_command() {
        let (engine, _, _) = engine();
        let mut session = quiet();
        for _ in 0..3 {
            engine.handle_message("riya", "blorp", &mut session);
        }
        let daily = engine.ledger().daily();
        assert_eq!(daily.counter(CounterKind::CommandIssued), 3);
    }

    #[test]
    fn study_and_coding_hints_award_xp() {
        let (engine, _, _) = engine();
        let mut session = quiet();

        engine.handle_message("riya", "time to study", &mut session);
        let state = engine.game_state();
        assert_eq!(state.total_xp, 5);

        engine.handle_message("riya", "debug my python code", &mut session);
        assert_eq!(engine.game_state().total_xp, 10);

        engine.handle_message("riya", "a studious encoder", &mut session);
        assert_eq!(engine.game_state().total_xp, 10);
    }

    #[test]
    fn updated_profiles_are_persisted() {
        let (engine, store, _) = engine();
        let mut session = quiet();
        let resp = engine.handle_message("riya", "my name is Riya", &mut session);
        assert!(resp.updated_profile.is_some());
        let saved: Profile = ProfileStore::get(store.as_ref(), "riya");
        assert_eq!(saved.name.as_deref(), Some("Riya"));

        let resp = engine.handle_message("riya", "hi", &mut session);
        assert!(resp.text.contains("Riya"));
        assert!(resp.updated_profile.is_none());
    }

    #[test]
    fn timer_completion_reaches_daily_quests() {
        let (engine, _, sink) = engine();
        engine.timer().start(1, TimerMode::Focus);
        engine.timer().tick();
        engine.timer().tick();
        assert_eq!(engine.ledger().daily().counter(CounterKind::TimerCompleted), 1);
        assert_eq!(sink.count("timer_done"), 1);
    }

    #[test]
    fn set_mode_normalizes() {
        let (engine, _, _) = engine();
        assert_eq!(engine.set_mode("CODING"), Mode::Coding);
        assert_eq!(engine.set_mode("gardening"), Mode::Balanced);
        assert_eq!(engine.add_xp("mystery", 7).gained, 7);
    }
}
