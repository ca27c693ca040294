use clap::{Parser, Subcommand};
use focushub_core::{logging, HubConfig};

mod commands;

#[derive(Parser)]
#[command(name = "focushub", version, about = "Focus Hub CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Daily habit tracking
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Weekly planner tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Markdown notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Daily quote cache
    Quote {
        #[command(subcommand)]
        action: commands::quote::QuoteAction,
    },
    /// Focus and habit statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Active view selection
    View {
        #[command(subcommand)]
        action: commands::view::ViewAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = HubConfig::load_or_default();
    let _guard = match logging::init(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Quote { action } => commands::quote::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::View { action } => commands::view::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
