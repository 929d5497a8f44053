//! Gamification: XP, levels, mode multiplier and the daily quest block.

mod daily;
mod ledger;

pub use daily::{ensure_daily_block, CounterKind, DailyBlock, QuestCompletion, QuestStatus, DAILY_QUESTS};
pub use ledger::{xp_needed, GameState, LastAction, Ledger, Mode, XpAward, XpKind, LEDGER_KEY};
