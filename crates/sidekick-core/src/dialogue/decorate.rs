//! Decoration pass applied to every handler reply.
//!
//! Output is assembled as:
//!
//! ```text
//! [persona intro]      on a new persona selection
//! [time-of-day theme]  at most every `time_theme_interval_secs`
//! [chaos frames]       "chaos"/"matrix" or by chance, throttled
//! [event vignette]     "throw"/"fireball" or by chance, throttled, grants loot
//! reply
//! ```
//!
//! then every non-ANSI line is restyled by the active persona and the
//! persona emoji is prefixed.

use chrono::{DateTime, Datelike, Local, Timelike, Utc};

use super::loot::random_throwable;
use super::persona::{apply_style, is_ansi_frame, pick_persona, PersonaKind};
use super::Turn;
use crate::chance::choose;
use crate::storage::DialogueConfig;

pub(super) const CHAOS_FRAMES: [&str; 3] = [
    "\x1b[32m░▒▓▒░▒▓▒░▒▓ MATRIX RAIN ACTIVE ░▒▓▒░▒▓▒░\x1b[0m",
    "\x1b[36m/\\/\\/\\ spinning glyphs /\\/\\/\\\x1b[0m",
    "\x1b[35m>>> random sparks >>> 010101010 <<<\x1b[0m",
];

static SEASON_LINES: [[&str; 2]; 4] = [
    ["Cherry blossom breeze active.", "Digital rain smells like fresh code."],
    ["Heatwave buff: +5 energy.", "Solar flare glitter everywhere."],
    ["Leaves crunch in the terminal.", "Pumpkin spice packets unlocked."],
    ["Frosty pixels dance around.", "Snowflakes drift across the UI."],
];

pub(super) struct Decorator {
    config: DialogueConfig,
}

impl Decorator {
    pub fn new(config: DialogueConfig) -> Self {
        Self { config }
    }

    pub fn decorate(&self, turn: &mut Turn<'_>, body: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.shift_persona(turn));
        parts.extend(self.time_theme(turn));
        parts.extend(self.chaos(turn));
        parts.extend(self.event(turn));
        if !body.is_empty() {
            parts.push(body.to_string());
        }
        self.render(turn, &parts.join("\n"))
    }

    /// Returns the intro line when a (new) persona was selected.
    fn shift_persona(&self, turn: &mut Turn<'_>) -> Option<String> {
        let current = turn.session.persona;
        let due = match (current, turn.session.last_persona_shift_at) {
            (Some(_), Some(last)) => {
                elapsed_secs(turn.now, last) > self.config.persona_shift_secs
                    || turn.chance().hits(self.config.persona_shift_chance)
            }
            _ => true,
        };
        if !due {
            return None;
        }

        let next = pick_persona(turn.chance(), current);
        let persona = next.persona();
        turn.session.persona = Some(next);
        turn.session.typing_style = persona.style;
        turn.session.last_persona_shift_at = Some(turn.now);
        tracing::debug!(persona = persona.label, "persona shifted");
        Some((*choose(turn.chance(), &persona.intros)).to_string())
    }

    fn time_theme(&self, turn: &mut Turn<'_>) -> Option<String> {
        let due = turn.session.last_time_theme_at.map_or(true, |last| {
            elapsed_secs(turn.now, last) > self.config.time_theme_interval_secs
        });
        if !due {
            return None;
        }
        turn.session.last_time_theme_at = Some(turn.now);

        let local = turn.now.with_timezone(&Local);
        let base = match local.hour() {
            5..=11 => "Good morning sunshine! Fresh photons for your brain.",
            12..=16 => "Midday grind time. Hydrate + dominate.",
            17..=21 => "Golden hour focus. Let's wrap things up smart.",
            _ => "Late night ops engaged. Cozy vibes, sharp mind.",
        };
        let season = match local.month() {
            3..=5 => &SEASON_LINES[0],
            6..=8 => &SEASON_LINES[1],
            9..=11 => &SEASON_LINES[2],
            _ => &SEASON_LINES[3],
        };
        let weather = *choose(turn.chance(), season);
        Some(format!("{base} {weather}"))
    }

    fn chaos(&self, turn: &mut Turn<'_>) -> Option<String> {
        let asked = turn.lower.contains("chaos") || turn.lower.contains("matrix");
        if !asked && !turn.chance().hits(self.config.chaos_chance) {
            return None;
        }
        if !self.cooled_down(turn.session.last_chaos_at, turn.now) {
            return None;
        }
        turn.session.last_chaos_at = Some(turn.now);

        let start = turn.chance().pick(CHAOS_FRAMES.len());
        let frames: Vec<&str> = (0..CHAOS_FRAMES.len())
            .map(|i| CHAOS_FRAMES[(start + i) % CHAOS_FRAMES.len()])
            .collect();
        Some(frames.join("\n"))
    }

    fn event(&self, turn: &mut Turn<'_>) -> Option<String> {
        let asked = turn.lower.contains("throw") || turn.lower.contains("fireball");
        if !asked && !turn.chance().hits(self.config.event_chance) {
            return None;
        }
        if !self.cooled_down(turn.session.last_event_at, turn.now) {
            return None;
        }
        turn.session.last_event_at = Some(turn.now);

        let thrown = random_throwable(turn.chance());
        let mut message = format!("Sidekick hurls {}! 💥 {}", thrown.object, thrown.reaction);
        if let Some(reward) = turn.grant(thrown.coins, Some(thrown.item)) {
            message.push('\n');
            message.push_str(&reward);
        }
        Some(message)
    }

    fn cooled_down(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        last.map_or(true, |last| {
            elapsed_secs(now, last) > self.config.flourish_cooldown_secs
        })
    }

    fn render(&self, turn: &mut Turn<'_>, text: &str) -> String {
        let persona = turn.session.persona.unwrap_or(PersonaKind::Chill).persona();
        let style = turn.session.typing_style;
        let styled: Vec<String> = text
            .lines()
            .map(|line| {
                if is_ansi_frame(line) {
                    line.to_string()
                } else {
                    apply_style(style, line, turn.chance())
                }
            })
            .collect();
        let styled = styled.join("\n");
        if styled.is_empty() {
            styled
        } else {
            format!("{} {styled}", persona.emoji)
        }
    }
}

fn elapsed_secs(now: DateTime<Utc>, since: DateTime<Utc>) -> i64 {
    (now - since).num_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;
    use crate::dialogue::{Profile, SessionContext};
    use chrono::Duration;

    fn decorate_at(
        decorator: &Decorator,
        text: &str,
        at: DateTime<Utc>,
        profile: &mut Profile,
        session: &mut SessionContext,
    ) -> (String, bool) {
        let mut turn = Turn::new(text, at, profile, session);
        let out = decorator.decorate(&mut turn, "body");
        let dirty = turn.is_dirty();
        (out, dirty)
    }

    #[test]
    fn persona_holds_until_the_shift_window_passes() {
        let d = Decorator::new(DialogueConfig::default());
        let mut profile = Profile::default();
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        let t0 = Utc::now();

        let (first, _) = decorate_at(&d, "hey", t0, &mut profile, &mut session);
        assert!(first.starts_with("😎 *Sidekick leans back"));

        let (second, _) = decorate_at(&d, "hey", t0 + Duration::seconds(30), &mut profile, &mut session);
        assert!(!second.contains("leans back"));
        assert_eq!(session.persona, Some(PersonaKind::Chill));

        let (third, _) = decorate_at(&d, "hey", t0 + Duration::seconds(91), &mut profile, &mut session);
        assert_eq!(session.persona, Some(PersonaKind::Dramatic));
        assert!(third.starts_with("🎭 *THUNDER CRACKS"));
        assert!(third.ends_with("BODY"));
    }

    #[test]
    fn time_theme_appears_once_per_interval() {
        let d = Decorator::new(DialogueConfig::default());
        let mut profile = Profile::default();
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        let t0 = Utc::now();

        let (first, _) = decorate_at(&d, "x", t0, &mut profile, &mut session);
        assert_eq!(first.lines().count(), 3);
        let (second, _) = decorate_at(&d, "x", t0 + Duration::seconds(10), &mut profile, &mut session);
        assert_eq!(second.lines().count(), 1);
        let (third, _) = decorate_at(&d, "x", t0 + Duration::seconds(301), &mut profile, &mut session);
        assert!(third.lines().count() >= 2);
    }

    #[test]
    fn chaos_frames_are_throttled_and_never_styled() {
        let d = Decorator::new(DialogueConfig::default());
        let mut profile = Profile::default();
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        session.persona = Some(PersonaKind::Dramatic);
        session.typing_style = PersonaKind::Dramatic.persona().style;
        session.last_persona_shift_at = Some(Utc::now());
        session.last_time_theme_at = Some(Utc::now());
        let t0 = Utc::now();

        let (out, _) = decorate_at(&d, "enter the matrix", t0, &mut profile, &mut session);
        assert!(out.contains("MATRIX RAIN ACTIVE"));
        assert!(out.contains("spinning glyphs"));
        assert!(out.ends_with("BODY"));

        let (out, _) = decorate_at(&d, "more chaos", t0 + Duration::seconds(5), &mut profile, &mut session);
        assert!(!out.contains("\x1b["));

        let (out, _) = decorate_at(&d, "more chaos", t0 + Duration::seconds(25), &mut profile, &mut session);
        assert!(out.contains("\x1b["));
    }

    #[test]
    fn event_vignette_grants_loot() {
        let d = Decorator::new(DialogueConfig::default());
        let mut profile = Profile::default();
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        let t0 = Utc::now();

        let (out, dirty) = decorate_at(&d, "throw something", t0, &mut profile, &mut session);
        assert!(dirty);
        assert!(out.contains("Sidekick hurls a blazing fireball!"));
        assert_eq!(profile.coins, 6);
        assert_eq!(profile.inventory, vec!["Molten Ember"]);

        let (_, dirty) = decorate_at(&d, "throw again", t0 + Duration::seconds(3), &mut profile, &mut session);
        assert!(!dirty);
        assert_eq!(profile.coins, 6);
    }

    #[test]
    fn forced_chance_fires_everything() {
        let d = Decorator::new(DialogueConfig::default());
        let mut profile = Profile::default();
        let mut session = SessionContext::with_chance(Box::new(FixedChance::always()));
        let (out, dirty) = decorate_at(&d, "plain text", Utc::now(), &mut profile, &mut session);
        assert!(dirty);
        assert!(out.contains("MATRIX RAIN ACTIVE"));
        assert!(out.contains("hurls"));
    }
}
