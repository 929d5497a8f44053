use std::sync::LazyLock;

use regex::Regex;

use super::Handler;
use crate::chance::choose;
use crate::dialogue::loot::{random_loot, QUEST_REWARD_COINS};
use crate::dialogue::{ActiveQuest, Reply, Turn};
use crate::error::DialogueError;

pub struct QuestStage {
    pub prompt: &'static str,
    pub keyword: &'static str,
}

pub struct QuestTemplate {
    pub name: &'static str,
    pub title: &'static str,
    pub stages: &'static [QuestStage],
}

pub static QUEST_TEMPLATES: [QuestTemplate; 2] = [
    QuestTemplate {
        name: "code_hunt",
        title: "Code Hunt",
        stages: &[
            QuestStage {
                prompt: "Quest stage 1: What is the binary of 5?",
                keyword: "101",
            },
            QuestStage {
                prompt: "Stage 2: Type the magic word 'focus' backwards.",
                keyword: "sucof",
            },
            QuestStage {
                prompt: "Final stage: say 'quest clear' to grab rewards!",
                keyword: "quest clear",
            },
        ],
    },
    QuestTemplate {
        name: "riddle_room",
        title: "Riddle Room",
        stages: &[
            QuestStage {
                prompt: "Riddle: I have keys but no locks. Answer?",
                keyword: "keyboard",
            },
            QuestStage {
                prompt: "Nice! Type 'next challenge' to proceed.",
                keyword: "next challenge",
            },
            QuestStage {
                prompt: "Yell 'victory' to claim loot!",
                keyword: "victory",
            },
        ],
    },
];

// Word-bounded so "question" does not start a quest.
static TRIGGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:mini quest|quest|challenge me)\b").unwrap());

pub fn template(name: &str) -> Option<&'static QuestTemplate> {
    QUEST_TEMPLATES.iter().find(|t| t.name == name)
}

pub struct Quest;

impl Handler for Quest {
    fn name(&self) -> &'static str {
        "quest"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let Some(active) = turn.session.active_quest.clone() else {
            if !TRIGGER_RE.is_match(&turn.lower) {
                return Ok(None);
            }
            let picked = choose(turn.chance(), &QUEST_TEMPLATES);
            turn.session.active_quest = Some(ActiveQuest {
                name: picked.name.to_string(),
                stage: 0,
            });
            return Ok(Some(
                format!("Quest '{}' activated! {}", picked.title, picked.stages[0].prompt).into(),
            ));
        };

        let Some(quest) = template(&active.name) else {
            turn.session.active_quest = None;
            return Err(DialogueError::new(
                "quest",
                format!("unknown quest template '{}'", active.name),
            ));
        };
        let Some(stage) = quest.stages.get(active.stage) else {
            turn.session.active_quest = None;
            return Err(DialogueError::new(
                "quest",
                format!("quest '{}' has no stage {}", active.name, active.stage),
            ));
        };

        if !turn.lower.contains(stage.keyword) {
            return Ok(Some(format!("Quest hint → {}", stage.prompt).into()));
        }

        let next = active.stage + 1;
        if let Some(following) = quest.stages.get(next) {
            turn.session.active_quest = Some(ActiveQuest {
                name: active.name,
                stage: next,
            });
            return Ok(Some(following.prompt.into()));
        }

        turn.session.active_quest = None;
        let item = random_loot(turn.chance());
        let mut out = "Quest complete!".to_string();
        if let Some(reward) = turn.grant(QUEST_REWARD_COINS, Some(item)) {
            out.push(' ');
            out.push_str(&reward);
        }
        tracing::debug!(quest = quest.name, item, "quest completed");
        Ok(Some(out.into()))
    }
}
