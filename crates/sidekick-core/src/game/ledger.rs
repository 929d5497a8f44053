//! Level/XP record.
//!
//! The whole [`GameState`] lives behind one mutex and is flushed to the
//! key-value store inside the same critical section as the mutation, so
//! concurrent awards serialize and the stored record never lags behind the
//! in-memory one by more than a failed write.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::daily::{ensure_daily_block, CounterKind, DailyBlock, QuestCompletion};
use crate::clock::Clock;
use crate::events::{publish, Event, NotificationSink};
use crate::storage::{load_json, save_json, KvStore};
use crate::timer::{CompletionHook, TimerMode};

/// Storage key of the ledger record.
pub const LEDGER_KEY: &str = "gamification";

const MODE_MULTIPLIER: f64 = 1.2;

/// XP needed to leave `level`.
pub fn xp_needed(level: u32) -> u32 {
    50 + 20 * level
}

/// Which kind of XP earns the multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Study,
    Coding,
    #[default]
    Balanced,
}

impl Mode {
    /// Unknown names fall back to `Balanced`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "study" => Mode::Study,
            "coding" => Mode::Coding,
            _ => Mode::Balanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Study => "study",
            Mode::Coding => "coding",
            Mode::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XpKind {
    Study,
    Coding,
    General,
}

impl XpKind {
    /// Unknown names fall back to `General`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "study" => XpKind::Study,
            "coding" => XpKind::Coding,
            _ => XpKind::General,
        }
    }

    fn boosted_by(self, mode: Mode) -> bool {
        matches!(
            (self, mode),
            (XpKind::Study, Mode::Study) | (XpKind::Coding, Mode::Coding)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastAction {
    pub kind: XpKind,
    pub amount: i64,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub level: u32,
    pub xp: u32,
    pub total_xp: u64,
    pub mode: Mode,
    pub last_action: Option<LastAction>,
    pub badges: Vec<String>,
    pub daily: Option<DailyBlock>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            mode: Mode::Balanced,
            last_action: None,
            badges: Vec::new(),
            daily: None,
        }
    }
}

impl GameState {
    /// Apply an award to this state. Returns the award report.
    fn apply_xp(&mut self, kind: XpKind, amount: i64, at: DateTime<Utc>) -> XpAward {
        if amount <= 0 {
            return XpAward::unchanged(self);
        }

        let multiplier = if kind.boosted_by(self.mode) {
            MODE_MULTIPLIER
        } else {
            1.0
        };
        let gained = (amount as f64 * multiplier).floor().min(u32::MAX as f64) as u32;

        self.xp = self.xp.saturating_add(gained);
        self.total_xp = self.total_xp.saturating_add(u64::from(gained));
        self.last_action = Some(LastAction {
            kind,
            amount: i64::from(gained),
            at,
        });

        // Records loaded from disk may start below level 1.
        self.level = self.level.max(1);
        let mut levels_gained = 0;
        while self.xp >= xp_needed(self.level) {
            self.xp -= xp_needed(self.level);
            self.level += 1;
            levels_gained += 1;
        }

        XpAward {
            gained,
            levels_gained,
            level: self.level,
            xp: self.xp,
            xp_needed: xp_needed(self.level),
            total_xp: self.total_xp,
        }
    }
}

/// Outcome of one `add_xp` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpAward {
    pub gained: u32,
    pub levels_gained: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_needed: u32,
    pub total_xp: u64,
}

impl XpAward {
    fn unchanged(state: &GameState) -> Self {
        Self {
            gained: 0,
            levels_gained: 0,
            level: state.level,
            xp: state.xp,
            xp_needed: xp_needed(state.level),
            total_xp: state.total_xp,
        }
    }
}

pub struct Ledger {
    state: Mutex<GameState>,
    store: Arc<dyn KvStore>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Load the ledger from `store`, starting fresh if nothing (or nothing
    /// readable) is stored.
    pub fn open(
        store: Arc<dyn KvStore>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = match load_json::<GameState, _>(store.as_ref(), LEDGER_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => GameState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable ledger, starting fresh");
                GameState::default()
            }
        };
        Self {
            state: Mutex::new(state),
            store,
            sink,
            clock,
        }
    }

    /// Award XP of `kind`. Amounts ≤ 0 change nothing.
    pub fn add_xp(&self, kind: XpKind, amount: i64) -> XpAward {
        let now = self.clock.now();
        let award = {
            let mut state = self.lock();
            let award = state.apply_xp(kind, amount, now);
            if award.gained > 0 {
                self.persist(&state);
            }
            award
        };
        if award.gained > 0 {
            tracing::debug!(?kind, amount, gained = award.gained, "xp awarded");
        }
        self.announce_level_up(&award, now);
        award
    }

    pub fn game_state(&self) -> GameState {
        self.lock().clone()
    }

    /// Set the multiplier mode from a free-form name.
    pub fn set_mode(&self, raw: &str) -> Mode {
        let mode = Mode::normalize(raw);
        let mut state = self.lock();
        if state.mode != mode {
            state.mode = mode;
            self.persist(&state);
        }
        mode
    }

    /// Today's block, created if stale or missing.
    pub fn daily(&self) -> DailyBlock {
        let today = self.clock.today();
        let mut state = self.lock();
        let stale = state.daily.as_ref().map_or(true, |d| d.date != today);
        let block = ensure_daily_block(&mut state, today).clone();
        if stale {
            self.persist(&state);
        }
        block
    }

    /// Increment a daily counter and pay out its quest when it completes.
    pub fn bump_counter(&self, kind: CounterKind) -> Option<QuestCompletion> {
        let today = self.clock.today();
        let now = self.clock.now();
        let (completion, award) = {
            let mut state = self.lock();
            let completion = ensure_daily_block(&mut state, today).bump(kind);
            let award = completion
                .as_ref()
                .map(|done| state.apply_xp(done.xp_kind, i64::from(done.reward), now));
            self.persist(&state);
            (completion, award)
        };

        if let Some(done) = &completion {
            tracing::debug!(quest = done.id, reward = done.reward, "daily quest completed");
            publish(
                self.sink.as_ref(),
                Event::QuestCompleted {
                    id: done.id.to_string(),
                    reward: done.reward,
                    at: now,
                },
            );
        }
        if let Some(award) = &award {
            self.announce_level_up(award, now);
        }
        completion
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn announce_level_up(&self, award: &XpAward, at: DateTime<Utc>) {
        if award.levels_gained == 0 {
            return;
        }
        publish(
            self.sink.as_ref(),
            Event::LevelUp {
                level: award.level,
                levels_gained: award.levels_gained,
                at,
            },
        );
    }

    fn persist(&self, state: &GameState) {
        if let Err(e) = save_json(self.store.as_ref(), LEDGER_KEY, state) {
            tracing::warn!(error = %e, "failed to persist ledger");
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CompletionHook for Ledger {
    fn timer_completed(&self, mode: TimerMode) {
        tracing::debug!(%mode, "counting finished timer");
        self.bump_counter(CounterKind::TimerCompleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StorageError;
    use crate::events::MemorySink;
    use crate::storage::MemoryStore;

    fn ledger() -> (Ledger, Arc<MemoryStore>, Arc<MemorySink>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(MemorySink::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let ledger = Ledger::open(store.clone(), sink.clone(), clock.clone());
        (ledger, store, sink, clock)
    }

    #[test]
    fn xp_needed_grows_linearly() {
        assert_eq!(xp_needed(1), 70);
        assert_eq!(xp_needed(2), 90);
        assert_eq!(xp_needed(10), 250);
    }

    #[test]
    fn matching_mode_multiplies_and_truncates() {
        let (ledger, ..) = ledger();
        assert_eq!(ledger.set_mode("study"), Mode::Study);
        let award = ledger.add_xp(XpKind::Study, 10);
        assert_eq!(award.gained, 12);

        let award = ledger.add_xp(XpKind::Study, 7);
        assert_eq!(award.gained, 8);

        let award = ledger.add_xp(XpKind::Coding, 10);
        assert_eq!(award.gained, 10);
    }

    #[test]
    fn last_action_records_the_boosted_amount() {
        let (ledger, ..) = ledger();
        ledger.set_mode("study");
        let award = ledger.add_xp(XpKind::Study, 10);
        let last = ledger.game_state().last_action.unwrap();
        assert_eq!(last.kind, XpKind::Study);
        assert_eq!(last.amount, i64::from(award.gained));
        assert_eq!(last.amount, 12);
    }

    #[test]
    fn zero_and_negative_amounts_are_noops() {
        let (ledger, store, ..) = ledger();
        let before = ledger.game_state();
        let award = ledger.add_xp(XpKind::General, 0);
        assert_eq!(award.gained, 0);
        assert_eq!(ledger.add_xp(XpKind::General, -5).gained, 0);
        assert_eq!(ledger.game_state(), before);
        assert_eq!(store.kv_get(LEDGER_KEY).unwrap(), None);
    }

    #[test]
    fn large_award_rolls_over_several_levels() {
        let (ledger, _, sink, _) = ledger();
        // 70 + 90 + 110 = 270 leaves level 4 with 30 xp.
        let award = ledger.add_xp(XpKind::General, 300);
        assert_eq!(award.levels_gained, 3);
        assert_eq!(award.level, 4);
        assert_eq!(award.xp, 30);
        assert!(award.xp < award.xp_needed);
        assert_eq!(award.total_xp, 300);
        assert_eq!(sink.count("level_up"), 1);
    }

    #[test]
    fn mode_names_are_normalized() {
        let (ledger, ..) = ledger();
        assert_eq!(ledger.set_mode(" Coding "), Mode::Coding);
        assert_eq!(ledger.set_mode("gaming"), Mode::Balanced);
        assert_eq!(ledger.game_state().mode, Mode::Balanced);
        assert_eq!(XpKind::parse("weird"), XpKind::General);
    }

    #[test]
    fn awards_are_flushed_and_reloaded() {
        let (ledger, store, sink, clock) = ledger();
        ledger.add_xp(XpKind::Coding, 40);
        let reopened = Ledger::open(store, sink, clock);
        let state = reopened.game_state();
        assert_eq!(state.xp, 40);
        assert_eq!(state.last_action.map(|a| a.kind), Some(XpKind::Coding));
    }

    #[test]
    fn quest_pays_out_once_and_emits() {
        let (ledger, _, sink, _) = ledger();
        assert!(ledger.bump_counter(CounterKind::TimerCompleted).is_none());
        let done = ledger.bump_counter(CounterKind::TimerCompleted).unwrap();
        assert_eq!(done.id, "timer2");
        assert!(ledger.bump_counter(CounterKind::TimerCompleted).is_none());

        assert_eq!(sink.count("quest_completed"), 1);
        let state = ledger.game_state();
        assert_eq!(state.total_xp, 20);
        assert_eq!(state.daily.unwrap().pomodoros_done, 3);
    }

    #[test]
    fn daily_block_resets_on_a_new_day() {
        let (ledger, _, _, clock) = ledger();
        for _ in 0..5 {
            ledger.bump_counter(CounterKind::CommandIssued);
        }
        assert!(ledger.daily().quests["commands5"].done);

        clock.advance(chrono::Duration::days(1));
        let block = ledger.daily();
        assert_eq!(block.commands_used, 0);
        assert!(block.quests.values().all(|q| !q.done));
    }

    #[test]
    fn timer_completion_counts_toward_quest() {
        let (ledger, ..) = ledger();
        ledger.timer_completed(TimerMode::Focus);
        assert_eq!(ledger.daily().pomodoros_done, 1);
    }

    struct ReadOnlyStore;

    impl KvStore for ReadOnlyStore {
        fn kv_get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn kv_set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn failed_writes_keep_the_in_memory_change() {
        let ledger = Ledger::open(
            Arc::new(ReadOnlyStore),
            Arc::new(MemorySink::new()),
            Arc::new(ManualClock::new(Utc::now())),
        );
        let award = ledger.add_xp(XpKind::General, 15);
        assert_eq!(award.gained, 15);
        assert_eq!(ledger.game_state().xp, 15);
    }
}
