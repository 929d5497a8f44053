use chrono::{Duration, Local, Utc};
use clap::Subcommand;

use super::{open_engine, print_json};
use crate::dispatch::parse_when;

#[derive(Subcommand)]
pub enum RemindAction {
    /// Add a reminder
    Add {
        /// Reminder text
        text: String,
        /// When to fire: HH:MM, "YYYY-MM-DD HH:MM" or RFC 3339
        #[arg(long, conflicts_with = "in_minutes")]
        at: Option<String>,
        /// Fire after this many minutes
        #[arg(long = "in")]
        in_minutes: Option<i64>,
    },
    /// List pending reminders
    List,
    /// Remove a reminder
    Remove {
        /// Reminder ID
        id: u64,
    },
    /// Fire due reminders until interrupted
    Watch,
}

pub fn run(action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let reminders = engine.reminders();

    match action {
        RemindAction::Add {
            text,
            at,
            in_minutes,
        } => {
            let fires_at = match (at, in_minutes) {
                (Some(raw), _) => {
                    parse_when(&raw, Local::now()).ok_or_else(|| format!("unrecognised time: {raw}"))?
                }
                (None, Some(minutes)) => Utc::now() + Duration::minutes(minutes.max(0)),
                (None, None) => return Err("either --at or --in is required".into()),
            };
            let id = reminders.add(text, fires_at);
            println!("Reminder created: {id}");
        }
        RemindAction::List => {
            print_json(&reminders.list())?;
        }
        RemindAction::Remove { id } => {
            if reminders.remove(id) {
                println!("Reminder removed: {id}");
            } else {
                return Err(format!("reminder not found: {id}").into());
            }
        }
        RemindAction::Watch => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                if let Err(e) = reminders.spawn().await {
                    tracing::warn!(error = %e, "reminder loop ended");
                }
            });
        }
    }
    Ok(())
}
