use clap::Subcommand;
use serde::Serialize;
use sidekick_core::game::{xp_needed, DAILY_QUESTS};

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum GameAction {
    /// Level, XP and mode
    Status,
    /// Switch the XP multiplier mode (study, coding, balanced)
    Mode {
        mode: String,
    },
    /// Award XP manually
    Xp {
        /// study, coding or general
        kind: String,
        amount: i64,
    },
    /// Today's quest counters
    Daily,
}

#[derive(Serialize)]
struct QuestLine {
    id: &'static str,
    title: &'static str,
    progress: u32,
    threshold: u32,
    reward: u32,
    done: bool,
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    match action {
        GameAction::Status => {
            let state = engine.game_state();
            println!(
                "Level {} ({}/{} XP, {} total) mode={}",
                state.level,
                state.xp,
                xp_needed(state.level),
                state.total_xp,
                state.mode
            );
        }
        GameAction::Mode { mode } => {
            let mode = engine.set_mode(&mode);
            println!("mode set to {mode}");
        }
        GameAction::Xp { kind, amount } => {
            let award = engine.add_xp(&kind, amount);
            print_json(&award)?;
        }
        GameAction::Daily => {
            let daily = engine.ledger().daily();
            let lines: Vec<QuestLine> = DAILY_QUESTS
                .iter()
                .map(|q| QuestLine {
                    id: q.id,
                    title: q.title,
                    progress: daily.counter(q.counter).min(q.threshold),
                    threshold: q.threshold,
                    reward: q.reward,
                    done: daily.quests.get(q.id).is_some_and(|s| s.done),
                })
                .collect();
            print_json(&lines)?;
        }
    }
    Ok(())
}
