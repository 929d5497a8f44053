//! Reward items.

use crate::chance::{choose, Chance};

pub const LOOT_TABLE: [&str; 4] = ["Nebula Sticker", "Focus Crystal", "Retro Floppy", "Solar Badge"];

pub const HACKING_REWARD_COINS: u32 = 10;
pub const QUEST_REWARD_COINS: u32 = 12;
pub const LAUGH_REWARD_COINS: u32 = 1;

/// Something the assistant throws during an event vignette.
#[derive(Debug, Clone, Copy)]
pub struct Throwable {
    pub object: &'static str,
    pub reaction: &'static str,
    pub coins: u32,
    pub item: &'static str,
}

pub const THROWABLES: [Throwable; 4] = [
    Throwable {
        object: "a blazing fireball",
        reaction: "You dodge like a ninja 🥷",
        coins: 6,
        item: "Molten Ember",
    },
    Throwable {
        object: "a quantum coffee cup",
        reaction: "You sip it mid-air like a boss ☕",
        coins: 4,
        item: "Hyper Brew Beans",
    },
    Throwable {
        object: "a mini black hole",
        reaction: "Gravity warps but you hold steady 🌀",
        coins: 8,
        item: "Pocket Singularity",
    },
    Throwable {
        object: "a confetti meteor",
        reaction: "You laugh as colors explode 🎉",
        coins: 5,
        item: "Prismatic Confetti",
    },
];

pub fn random_loot(chance: &mut dyn Chance) -> &'static str {
    *choose(chance, &LOOT_TABLE)
}

pub fn random_throwable(chance: &mut dyn Chance) -> Throwable {
    *choose(chance, &THROWABLES)
}
