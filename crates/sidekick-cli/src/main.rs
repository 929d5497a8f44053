use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod dispatch;
mod sink;

#[derive(Parser)]
#[command(name = "sidekick", version, about = "Sidekick study assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to Sidekick
    Chat(commands::chat::ChatArgs),
    /// XP, level, mode and daily quests
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Countdown timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// One-shot reminders
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
    /// Checklist management
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SIDEKICK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Chat(args) => commands::chat::run(args),
        Commands::Game { action } => commands::game::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Remind { action } => commands::remind::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
