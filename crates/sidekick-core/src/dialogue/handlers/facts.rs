//! "my name is X", "I like A, B", "my favorite subject is Y".

use std::sync::LazyLock;

use regex::Regex;

use super::humor::requested_style;
use super::Handler;
use crate::dialogue::{Reply, Turn};
use crate::error::DialogueError;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmy\s*name\s*is\s+([A-Za-z][\w\-']{1,40})\b").unwrap());
static SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bmy\s*fav(?:ou?)rite\s*subject\s*is\s+([A-Za-z][\w\- ]{1,40})\b").unwrap()
});
static HOBBIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bi\s*(?:like|love|enjoy)\s+(.+)").unwrap());
static LIST_SEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|&|\+|\band\b)\s*").unwrap());

pub struct ProfileFacts;

impl Handler for ProfileFacts {
    fn name(&self) -> &'static str {
        "profile_facts"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let text = turn.text.trim();

        if let Some(caps) = NAME_RE.captures(text) {
            let name = title_case(&caps[1]);
            let ack = format!("Saved your name as {name}.");
            turn.profile.name = Some(name);
            turn.mark_dirty();
            return Ok(Some(ack.into()));
        }

        if let Some(caps) = SUBJECT_RE.captures(text) {
            let subject = title_case(caps[1].trim());
            let ack = format!("Got it. Favorite subject set to {subject}.");
            turn.profile.favorite_subject = Some(subject);
            turn.mark_dirty();
            return Ok(Some(ack.into()));
        }

        // "I like puns" is a humor preference, not a hobby.
        if requested_style(&turn.lower).is_some() {
            return Ok(None);
        }
        if let Some(caps) = HOBBIES_RE.captures(text) {
            let items = split_list(&caps[1]);
            if !items.is_empty() {
                let ack = format!("Nice! I'll remember you like {}.", items.join(", "));
                turn.profile.hobbies = items;
                turn.mark_dirty();
                return Ok(Some(ack.into()));
            }
        }

        Ok(None)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    LIST_SEP_RE
        .split(raw)
        .map(|p| p.trim_matches(|c: char| c.is_whitespace() || ".,!;:".contains(c)))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
