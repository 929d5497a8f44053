use std::time::Duration;

use clap::Subcommand;
use sidekick_core::TimerMode;

use super::{open_engine, print_json};

const POLL: Duration = Duration::from_millis(250);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground; events go to stderr
    Run {
        /// Duration in seconds
        #[arg(long, conflicts_with = "minutes")]
        seconds: Option<u64>,
        /// Duration in minutes
        #[arg(long)]
        minutes: Option<u64>,
        /// focus, break, mini or shortFocus
        #[arg(long)]
        mode: Option<String>,
    },
    /// Print the configured defaults
    Defaults,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    match action {
        TimerAction::Run {
            seconds,
            minutes,
            mode,
        } => {
            let defaults = &engine.config().timer;
            let seconds = seconds
                .or(minutes.map(|m| m.saturating_mul(60)))
                .unwrap_or(defaults.default_seconds);
            let mode = mode
                .as_deref()
                .map(TimerMode::normalize)
                .unwrap_or(defaults.default_mode);

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                engine.timer().start(seconds, mode);
                let ticker = engine.timer().spawn();
                while engine.timer().status().active {
                    tokio::time::sleep(POLL).await;
                }
                ticker.abort();
            });
            print_json(&engine.game_state())?;
        }
        TimerAction::Defaults => {
            print_json(&engine.config().timer)?;
        }
    }
    Ok(())
}
