use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};

use super::persona::{PersonaKind, TypingStyle};
use crate::chance::{Chance, ThreadChance};

/// Position in the hacking mini-game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HackingStage {
    #[default]
    Idle,
    Stage0,
    Stage1,
    Stage2,
}

impl HackingStage {
    /// Index into the hacking sequence, `None` when idle.
    pub fn index(self) -> Option<usize> {
        match self {
            HackingStage::Idle => None,
            HackingStage::Stage0 => Some(0),
            HackingStage::Stage1 => Some(1),
            HackingStage::Stage2 => Some(2),
        }
    }

    /// The stage after this one; the last stage wraps back to `Idle`.
    pub fn next(self) -> Self {
        match self {
            HackingStage::Idle => HackingStage::Stage0,
            HackingStage::Stage0 => HackingStage::Stage1,
            HackingStage::Stage1 => HackingStage::Stage2,
            HackingStage::Stage2 => HackingStage::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuest {
    pub name: String,
    pub stage: usize,
}

/// Per-conversation state. Lives as long as the conversation and is never
/// persisted; coins, loot and the coding follow-up slot live on the
/// [`Profile`](super::Profile) instead.
pub struct SessionContext {
    pub persona: Option<PersonaKind>,
    pub typing_style: TypingStyle,
    pub last_persona_shift_at: Option<DateTime<Utc>>,
    pub active_quest: Option<ActiveQuest>,
    pub hacking: HackingStage,
    pub recent_intents: VecDeque<&'static str>,
    pub last_chaos_at: Option<DateTime<Utc>>,
    pub last_event_at: Option<DateTime<Utc>>,
    pub last_time_theme_at: Option<DateTime<Utc>>,
    chance: Box<dyn Chance>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::with_chance(Box::new(ThreadChance::new()))
    }

    pub fn with_chance(chance: Box<dyn Chance>) -> Self {
        Self {
            persona: None,
            typing_style: TypingStyle::Normal,
            last_persona_shift_at: None,
            active_quest: None,
            hacking: HackingStage::Idle,
            recent_intents: VecDeque::new(),
            last_chaos_at: None,
            last_event_at: None,
            last_time_theme_at: None,
            chance,
        }
    }

    pub fn chance(&mut self) -> &mut dyn Chance {
        self.chance.as_mut()
    }

    /// Remember which handler answered, dropping the oldest past `cap`.
    pub fn record_intent(&mut self, intent: &'static str, cap: usize) {
        self.recent_intents.push_back(intent);
        while self.recent_intents.len() > cap.max(1) {
            self.recent_intents.pop_front();
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("persona", &self.persona)
            .field("typing_style", &self.typing_style)
            .field("active_quest", &self.active_quest)
            .field("hacking", &self.hacking)
            .field("recent_intents", &self.recent_intents)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;

    #[test]
    fn hacking_stages_cycle_back_to_idle() {
        let mut stage = HackingStage::Idle;
        let mut seen = Vec::new();
        for _ in 0..4 {
            stage = stage.next();
            seen.push(stage.index());
        }
        assert_eq!(seen, vec![Some(0), Some(1), Some(2), None]);
    }

    #[test]
    fn recent_intents_are_bounded() {
        let mut ctx = SessionContext::with_chance(Box::new(FixedChance::never()));
        for _ in 0..25 {
            ctx.record_intent("small_talk", 20);
        }
        ctx.record_intent("quest", 20);
        assert_eq!(ctx.recent_intents.len(), 20);
        assert_eq!(ctx.recent_intents.back(), Some(&"quest"));
    }
}
