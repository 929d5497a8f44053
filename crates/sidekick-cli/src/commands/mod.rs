pub mod chat;
pub mod config;
pub mod game;
pub mod remind;
pub mod timer;
pub mod todo;

use std::sync::Arc;

use sidekick_core::{Config, Database, SessionEngine, SystemClock};

use crate::sink::StderrSink;

/// Engine over the on-disk database and config, publishing to stderr.
pub fn open_engine() -> Result<SessionEngine, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Arc::new(Database::open()?);
    Ok(SessionEngine::new(
        config,
        db,
        Arc::new(StderrSink),
        Arc::new(SystemClock),
    ))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
