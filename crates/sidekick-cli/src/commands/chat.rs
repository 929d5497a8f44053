use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Args;
use sidekick_core::{Response, SessionContext};

use super::open_engine;
use crate::dispatch::ChatDispatcher;

#[derive(Args)]
pub struct ChatArgs {
    /// Profile key to load and save
    #[arg(long, default_value = "default")]
    profile: String,
    /// Send one message and exit instead of starting the REPL
    #[arg(short, long)]
    message: Option<String>,
    /// Print full responses as JSON
    #[arg(long)]
    json: bool,
}

fn print_response(response: &Response, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(response)?);
        return Ok(());
    }
    println!("{}", response.text);
    if let Some(card) = &response.card {
        println!("[{}]", card.title);
        for bullet in &card.bullets {
            println!("  • {bullet}");
        }
    }
    Ok(())
}

pub fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let dispatcher = ChatDispatcher::new(engine.timer().clone(), engine.reminders().clone());
    let engine = engine.with_dispatcher(Arc::new(dispatcher));
    let mut session = SessionContext::new();

    if let Some(message) = args.message {
        let response = engine.handle_message(&args.profile, &message, &mut session);
        return print_response(&response, args.json);
    }

    // Timer and reminders keep running on the runtime's workers while the
    // main thread blocks on stdin.
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();
    let background = engine.spawn_background();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "exit" | "quit" | "bye") {
            break;
        }
        let response = engine.handle_message(&args.profile, text, &mut session);
        print_response(&response, args.json)?;
    }

    for handle in background {
        handle.abort();
    }
    Ok(())
}
