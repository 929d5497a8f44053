//! Output personas and their text-styling transforms.

use crate::chance::{choose, Chance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingStyle {
    Normal,
    /// Upper-case everything.
    Caps,
    /// Trail each line with four random emoji.
    Emoji,
    /// Space out the letters.
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonaKind {
    Chill,
    Dramatic,
    Sarcastic,
    Motivational,
    Glitch,
}

pub struct Persona {
    pub kind: PersonaKind,
    pub label: &'static str,
    pub style: TypingStyle,
    pub emoji: &'static str,
    pub intros: [&'static str; 2],
}

pub static PERSONAS: [Persona; 5] = [
    Persona {
        kind: PersonaKind::Chill,
        label: "Chill Sidekick",
        style: TypingStyle::Normal,
        emoji: "😎",
        intros: ["*Sidekick leans back, chilled out.*", "*Vibes mode activated.*"],
    },
    Persona {
        kind: PersonaKind::Dramatic,
        label: "Over-the-top Sidekick",
        style: TypingStyle::Caps,
        emoji: "🎭",
        intros: [
            "*Thunder cracks. Sidekick goes full drama.*",
            "*Curtains rise. Monologue mode.*",
        ],
    },
    Persona {
        kind: PersonaKind::Sarcastic,
        label: "Sarcasm Core Sidekick",
        style: TypingStyle::Emoji,
        emoji: "🙃",
        intros: [
            "*Sidekick smirks, sarcasm engaged.*",
            "*Cue sarcastic eyebrow raise.*",
        ],
    },
    Persona {
        kind: PersonaKind::Motivational,
        label: "Coach Sidekick",
        style: TypingStyle::Normal,
        emoji: "💪",
        intros: [
            "*Whistle blows. Coach Sidekick enters.*",
            "*Motivation cannon warming up.*",
        ],
    },
    Persona {
        kind: PersonaKind::Glitch,
        label: "Glitchy Sidekick",
        style: TypingStyle::Slow,
        emoji: "⚡",
        intros: [
            "*Static crackles. Sidekick glitches playfully.*",
            "*Systems flicker… glitch voice online.*",
        ],
    },
];

const EMOJI_SPAM: [&str; 4] = ["🔥", "😂", "✨", "😜"];

impl PersonaKind {
    pub fn persona(self) -> &'static Persona {
        match self {
            PersonaKind::Chill => &PERSONAS[0],
            PersonaKind::Dramatic => &PERSONAS[1],
            PersonaKind::Sarcastic => &PERSONAS[2],
            PersonaKind::Motivational => &PERSONAS[3],
            PersonaKind::Glitch => &PERSONAS[4],
        }
    }
}

/// Pick any persona, or any persona other than `current`.
pub fn pick_persona(chance: &mut dyn Chance, current: Option<PersonaKind>) -> PersonaKind {
    let candidates: Vec<PersonaKind> = PERSONAS
        .iter()
        .map(|p| p.kind)
        .filter(|k| Some(*k) != current)
        .collect();
    *choose(chance, &candidates)
}

/// True for lines carrying ANSI escapes; those are never restyled.
pub fn is_ansi_frame(line: &str) -> bool {
    line.contains("\x1b[")
}

pub fn apply_style(style: TypingStyle, line: &str, chance: &mut dyn Chance) -> String {
    match style {
        TypingStyle::Normal => line.to_string(),
        TypingStyle::Caps => line.to_uppercase(),
        TypingStyle::Emoji => {
            let spam: Vec<&str> = (0..4).map(|_| *choose(chance, &EMOJI_SPAM)).collect();
            format!("{line} {}", spam.join(" "))
        }
        TypingStyle::Slow => {
            let mut out = String::with_capacity(line.len() * 2);
            for ch in line.chars() {
                out.push(ch);
                if ch != ' ' {
                    out.push(' ');
                }
            }
            out.trim().to_string()
        }
    }
}
