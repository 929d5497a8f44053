use std::sync::LazyLock;

use regex::Regex;

use super::{personalize, Handler};
use crate::chance::choose;
use crate::dialogue::{Reply, Turn};
use crate::error::DialogueError;

static GREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:hi|hello|hey|yo|good\s*(?:morning|afternoon|evening))\b").unwrap()
});
static HOW_ARE_YOU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhow\s*(?:are|r)\s*(?:you|u)\b").unwrap());
static WHO_ARE_YOU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:who\s*are\s*you|what\s*is\s*your\s*name)\b").unwrap());
static SAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:i'?m|i am)\s*(?:sad|upset|down|depressed|unhappy|low)\b").unwrap()
});
static EXCITED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:i'?m|i am)\s*(?:excited|thrilled|pumped|stoked|happy)\b").unwrap()
});

const GREET: [&str; 3] = [
    "Hello friend! How can I help today?",
    "Hey friend! What can I do for you?",
    "Hi friend, ready when you are!",
];
const HOW_ARE_YOU: [&str; 3] = [
    "I'm good and ready to help you, friend.",
    "Doing great! How can I support you today, friend?",
    "Feeling productive. What shall we tackle, friend?",
];
const WHO_ARE_YOU: [&str; 3] = [
    "I'm Sidekick. Nice to meet you, friend!",
    "Sidekick here, your friendly assistant, friend.",
    "I'm Sidekick. Let's get things done, friend!",
];
const SAD: [&str; 3] = [
    "I'm here for you, friend. Want to talk about it?",
    "Sorry to hear that, friend. Let's take it one step at a time.",
    "I care, friend. Do you want a small exercise or a break suggestion?",
];
const EXCITED: [&str; 3] = [
    "Love that energy, friend! Want to channel it into something fun?",
    "Awesome! Let's ride that momentum, friend.",
    "Heck yes! What shall we build next, friend?",
];

/// Stateless greetings and mood replies.
pub struct SmallTalk;

impl Handler for SmallTalk {
    fn name(&self) -> &'static str {
        "small_talk"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let lines: &[&str] = if GREET_RE.is_match(turn.text) {
            &GREET
        } else if HOW_ARE_YOU_RE.is_match(turn.text) {
            &HOW_ARE_YOU
        } else if WHO_ARE_YOU_RE.is_match(turn.text) {
            &WHO_ARE_YOU
        } else if SAD_RE.is_match(turn.text) {
            &SAD
        } else if EXCITED_RE.is_match(turn.text) {
            &EXCITED
        } else {
            return Ok(None);
        };
        let line = *choose(turn.chance(), lines);
        Ok(Some(personalize(line, turn.profile.name.as_deref()).into()))
    }
}
