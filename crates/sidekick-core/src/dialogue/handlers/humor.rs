use std::sync::LazyLock;

use regex::Regex;

use super::Handler;
use crate::chance::choose;
use crate::dialogue::loot::LAUGH_REWARD_COINS;
use crate::dialogue::{HumorStyle, Reply, Turn};
use crate::error::DialogueError;

const STYLE_KEYWORDS: [(&str, HumorStyle); 6] = [
    ("puns", HumorStyle::Puns),
    ("pun", HumorStyle::Puns),
    ("meme", HumorStyle::Memes),
    ("roast", HumorStyle::Roasts),
    ("savage", HumorStyle::Roasts),
    ("anime", HumorStyle::Anime),
];

static LAUGH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:lol|lmao|ha(?:ha)+|rofl)\b").unwrap());

/// "i like puns", "love memes", ... in already lower-cased text.
pub fn requested_style(lower: &str) -> Option<HumorStyle> {
    STYLE_KEYWORDS.iter().find_map(|(keyword, style)| {
        (lower.contains(&format!("i like {keyword}")) || lower.contains(&format!("love {keyword}")))
            .then_some(*style)
    })
}

fn jokes(style: HumorStyle) -> &'static [&'static str] {
    match style {
        HumorStyle::Puns => &[
            "I would tell you a UDP joke, but you might not get it.",
            "I tried to catch fog yesterday. Mist!",
        ],
        HumorStyle::Memes => &[
            "This chat is officially certified based. 🔥",
            "*slides you a meme folder* It's all Zoom screenshots!",
        ],
        HumorStyle::Roasts => &[
            "Your procrastination speedrun is world-record tier.",
            "CPU usage is high, maybe stop overthinking that todo?",
        ],
        HumorStyle::Anime => &[
            "Believe it! Your focus power level is over 9000.",
            "I summon the spirit of productivity no jutsu!",
        ],
    }
}

/// Stores the requested joke style; laughter earns a coin.
pub struct HumorPreference;

impl Handler for HumorPreference {
    fn name(&self) -> &'static str {
        "humor_preference"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        if let Some(style) = requested_style(&turn.lower) {
            turn.profile.humor_style = Some(style);
            turn.mark_dirty();
            return Ok(Some(format!("Humor style locked to {}.", style.as_str()).into()));
        }
        if LAUGH_RE.is_match(&turn.lower) {
            let line = turn
                .grant(LAUGH_REWARD_COINS, None)
                .unwrap_or_else(|| "I'll keep those jokes coming.".to_string());
            return Ok(Some(line.into()));
        }
        Ok(None)
    }
}

/// Tells a joke in the stored style, or a random one.
pub struct Joke;

impl Handler for Joke {
    fn name(&self) -> &'static str {
        "joke"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let lower = &turn.lower;
        if !(lower.contains("joke") || lower.contains("make me laugh") || lower.contains("meme")) {
            return Ok(None);
        }
        let style = match turn.profile.humor_style {
            Some(style) => style,
            None => *choose(turn.chance(), &HumorStyle::ALL),
        };
        let line = *choose(turn.chance(), jokes(style));
        Ok(Some(line.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;
    use crate::dialogue::{Profile, SessionContext};
    use chrono::Utc;

    fn run(handler: &dyn Handler, text: &str, profile: &mut Profile) -> Option<String> {
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        let mut turn = Turn::new(text, Utc::now(), profile, &mut session);
        handler.try_handle(&mut turn).unwrap().map(|r| r.text)
    }

    #[test]
    fn style_keywords_map_to_styles() {
        assert_eq!(requested_style("i like savage stuff"), Some(HumorStyle::Roasts));
        assert_eq!(requested_style("i really love memes"), Some(HumorStyle::Memes));
        assert_eq!(requested_style("i like pizza"), None);
    }

    #[test]
    fn preference_is_stored() {
        let mut p = Profile::default();
        let reply = run(&HumorPreference, "I like anime", &mut p);
        assert_eq!(reply.as_deref(), Some("Humor style locked to anime."));
        assert_eq!(p.humor_style, Some(HumorStyle::Anime));
    }

    #[test]
    fn every_laugh_earns_a_coin() {
        let mut p = Profile::default();
        assert_eq!(run(&HumorPreference, "hahaha", &mut p).as_deref(), Some("Rewards → +1 coins"));
        run(&HumorPreference, "lol", &mut p);
        assert_eq!(p.coins, 2);
        assert!(run(&HumorPreference, "lollipop", &mut p).is_none());
    }

    #[test]
    fn jokes_follow_the_stored_style() {
        let mut p = Profile {
            humor_style: Some(HumorStyle::Roasts),
            ..Profile::default()
        };
        let reply = run(&Joke, "tell me a joke", &mut p).unwrap();
        assert!(jokes(HumorStyle::Roasts).contains(&reply.as_str()));

        p.humor_style = None;
        let reply = run(&Joke, "make me laugh", &mut p).unwrap();
        assert!(jokes(HumorStyle::Puns).contains(&reply.as_str()));
    }
}
