//! Scripted three-stage "hacking" cinematic.
//!
//! ```text
//! Idle --"hacking mode"--> Stage0 --override--> Stage1 --inject key--> Stage2 --unlock vault--> Idle (+reward)
//! ```
//!
//! Any other input while a stage is active stalls without changing state.

use super::Handler;
use crate::chance::choose;
use crate::dialogue::decorate::CHAOS_FRAMES;
use crate::dialogue::loot::{random_loot, HACKING_REWARD_COINS};
use crate::dialogue::{HackingStage, Reply, Turn};
use crate::error::DialogueError;

pub struct HackStep {
    pub prompt: &'static str,
    pub keyword: &'static str,
}

pub const HACKING_SEQUENCE: [HackStep; 3] = [
    HackStep {
        prompt: "Booting fake mainframe... type 'override' to breach.",
        keyword: "override",
    },
    HackStep {
        prompt: "Firewall spoofed. Enter 'inject key' to continue.",
        keyword: "inject key",
    },
    HackStep {
        prompt: "Almost there! Whisper 'unlock vault' to claim reward.",
        keyword: "unlock vault",
    },
];

const TRIGGER: &str = "hacking mode";
const STALL: &str = "Glyphs stream by... try the next command shown on screen.";

pub struct Hacking;

impl Handler for Hacking {
    fn name(&self) -> &'static str {
        "hacking"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let stage = turn.session.hacking;
        let Some(index) = stage.index() else {
            if !turn.lower.contains(TRIGGER) {
                return Ok(None);
            }
            turn.session.hacking = HackingStage::Stage0;
            let frame = *choose(turn.chance(), &CHAOS_FRAMES);
            return Ok(Some(
                format!("ACCESS GRANTED...\n{frame}\n{}", HACKING_SEQUENCE[0].prompt).into(),
            ));
        };

        let step = &HACKING_SEQUENCE[index];
        if !turn.lower.contains(step.keyword) {
            return Ok(Some(STALL.into()));
        }

        let next = stage.next();
        turn.session.hacking = next;
        match next.index() {
            Some(i) => Ok(Some(
                format!("STREAMING CODE...\n{}", HACKING_SEQUENCE[i].prompt).into(),
            )),
            None => {
                let item = random_loot(turn.chance());
                let mut out = "Hacking cinematic complete!".to_string();
                if let Some(reward) = turn.grant(HACKING_REWARD_COINS, Some(item)) {
                    out.push('\n');
                    out.push_str(&reward);
                }
                tracing::debug!(item, "hacking sequence completed");
                Ok(Some(out.into()))
            }
        }
    }
}
