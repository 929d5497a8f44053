//! The handler chain, in priority order.

pub mod facts;
pub mod fallback;
pub mod followup;
pub mod hacking;
pub mod homework;
pub mod humor;
pub mod inventory;
pub mod quest;
pub mod small_talk;

use std::sync::Arc;

use super::{KnowledgeBase, Reply, Turn};
use crate::error::DialogueError;

/// One link of the chain. `Ok(None)` passes the turn to the next handler.
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError>;
}

/// Facts first so they are never swallowed by a game prompt.
pub fn default_chain(knowledge: Option<Arc<dyn KnowledgeBase>>) -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(facts::ProfileFacts),
        Box::new(inventory::Inventory),
        Box::new(humor::HumorPreference),
        Box::new(hacking::Hacking),
        Box::new(quest::Quest),
        Box::new(small_talk::SmallTalk),
        Box::new(followup::TopicFollowUp),
        Box::new(humor::Joke),
        Box::new(homework::Homework::new(knowledge)),
    ]
}

/// Replace every "friend" with the stored name.
pub(crate) fn personalize(line: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => line.replace("friend", name),
        None => line.to_string(),
    }
}
