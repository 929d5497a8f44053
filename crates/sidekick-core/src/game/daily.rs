//! Day-scoped counters and one-shot bonus quests.
//!
//! The block is replaced wholesale whenever its date differs from today, so
//! every quest can pay out at most once per calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ledger::{GameState, XpKind};

/// Activity counters the rest of the engine can bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CounterKind {
    TimerCompleted,
    CommandIssued,
    ChecklistItemCompleted,
}

/// Static definition of a daily quest.
#[derive(Debug, Clone, Copy)]
pub struct DailyQuestDef {
    pub id: &'static str,
    pub title: &'static str,
    pub counter: CounterKind,
    pub threshold: u32,
    pub reward: u32,
    pub xp_kind: XpKind,
}

pub const DAILY_QUESTS: [DailyQuestDef; 3] = [
    DailyQuestDef {
        id: "timer2",
        title: "Finish 2 timer sessions",
        counter: CounterKind::TimerCompleted,
        threshold: 2,
        reward: 20,
        xp_kind: XpKind::Study,
    },
    DailyQuestDef {
        id: "commands5",
        title: "Issue 5 commands",
        counter: CounterKind::CommandIssued,
        threshold: 5,
        reward: 10,
        xp_kind: XpKind::General,
    },
    DailyQuestDef {
        id: "checklist3",
        title: "Complete 3 checklist items",
        counter: CounterKind::ChecklistItemCompleted,
        threshold: 3,
        reward: 15,
        xp_kind: XpKind::Study,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStatus {
    pub done: bool,
    pub reward: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBlock {
    pub date: NaiveDate,
    pub pomodoros_done: u32,
    pub commands_used: u32,
    pub todos_done: u32,
    pub quests: BTreeMap<String, QuestStatus>,
}

/// A quest that just flipped to done. The caller pays out the XP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    pub id: &'static str,
    pub reward: u32,
    pub xp_kind: XpKind,
}

impl DailyBlock {
    pub fn fresh(date: NaiveDate) -> Self {
        let quests = DAILY_QUESTS
            .iter()
            .map(|q| {
                (
                    q.id.to_string(),
                    QuestStatus {
                        done: false,
                        reward: q.reward,
                    },
                )
            })
            .collect();
        Self {
            date,
            pomodoros_done: 0,
            commands_used: 0,
            todos_done: 0,
            quests,
        }
    }

    pub fn counter(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::TimerCompleted => self.pomodoros_done,
            CounterKind::CommandIssued => self.commands_used,
            CounterKind::ChecklistItemCompleted => self.todos_done,
        }
    }

    fn counter_mut(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::TimerCompleted => &mut self.pomodoros_done,
            CounterKind::CommandIssued => &mut self.commands_used,
            CounterKind::ChecklistItemCompleted => &mut self.todos_done,
        }
    }

    /// Increment a counter and mark its quest done if it just hit the
    /// threshold. Returns the completion only the first time.
    pub fn bump(&mut self, kind: CounterKind) -> Option<QuestCompletion> {
        let counter = self.counter_mut(kind);
        *counter = counter.saturating_add(1);
        let value = *counter;

        let def = DAILY_QUESTS.iter().find(|q| q.counter == kind)?;
        // Blocks loaded from older data may be missing a quest; treat as undone.
        let status = self
            .quests
            .entry(def.id.to_string())
            .or_insert(QuestStatus {
                done: false,
                reward: def.reward,
            });
        if status.done || value < def.threshold {
            return None;
        }
        status.done = true;
        Some(QuestCompletion {
            id: def.id,
            reward: status.reward,
            xp_kind: def.xp_kind,
        })
    }
}

/// Return today's block, replacing a stale or missing one.
pub fn ensure_daily_block(state: &mut GameState, today: NaiveDate) -> &mut DailyBlock {
    let stale = state.daily.as_ref().map_or(true, |d| d.date != today);
    if stale {
        state.daily = Some(DailyBlock::fresh(today));
    }
    state.daily.get_or_insert_with(|| DailyBlock::fresh(today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn fresh_block_has_three_undone_quests() {
        let block = DailyBlock::fresh(day(1));
        assert_eq!(block.quests.len(), 3);
        assert!(block.quests.values().all(|q| !q.done));
        assert_eq!(block.quests["timer2"].reward, 20);
        assert_eq!(block.quests["commands5"].reward, 10);
        assert_eq!(block.quests["checklist3"].reward, 15);
    }

    #[test]
    fn threshold_two_pays_out_once_on_second_bump() {
        let mut block = DailyBlock::fresh(day(1));
        assert_eq!(block.bump(CounterKind::TimerCompleted), None);
        let done = block.bump(CounterKind::TimerCompleted).unwrap();
        assert_eq!(done.id, "timer2");
        assert_eq!(done.reward, 20);
        assert_eq!(block.bump(CounterKind::TimerCompleted), None);
        assert_eq!(block.pomodoros_done, 3);
    }

    #[test]
    fn counters_are_independent() {
        let mut block = DailyBlock::fresh(day(1));
        for _ in 0..4 {
            assert!(block.bump(CounterKind::CommandIssued).is_none());
        }
        assert!(block.bump(CounterKind::ChecklistItemCompleted).is_none());
        assert_eq!(block.bump(CounterKind::CommandIssued).map(|c| c.id), Some("commands5"));
        assert_eq!(block.counter(CounterKind::ChecklistItemCompleted), 1);
        assert_eq!(block.counter(CounterKind::TimerCompleted), 0);
    }

    #[test]
    fn stale_block_is_replaced_wholesale() {
        let mut state = GameState::default();
        {
            let block = ensure_daily_block(&mut state, day(1));
            block.bump(CounterKind::TimerCompleted);
            block.bump(CounterKind::TimerCompleted);
        }
        assert!(state.daily.as_ref().unwrap().quests["timer2"].done);

        let block = ensure_daily_block(&mut state, day(2));
        assert_eq!(block.date, day(2));
        assert_eq!(block.pomodoros_done, 0);
        assert!(block.quests.values().all(|q| !q.done));
    }

    #[test]
    fn same_day_block_is_kept() {
        let mut state = GameState::default();
        ensure_daily_block(&mut state, day(1)).bump(CounterKind::CommandIssued);
        assert_eq!(ensure_daily_block(&mut state, day(1)).commands_used, 1);
    }
}
