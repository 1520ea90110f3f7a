use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "chamada", version, about = "Chamada attendance CLI")]
struct Cli {
    /// Backend base URL (overrides the configured one)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate recurring lesson occurrences and associate students
    Generate(commands::generate::GenerateArgs),
    /// Lesson management
    Lesson {
        #[command(subcommand)]
        action: commands::lesson::LessonAction,
    },
    /// Attendance roster for one lesson
    Attendance {
        #[command(subcommand)]
        action: commands::attendance::AttendanceAction,
    },
    /// Scan-event log of one lesson
    Events {
        #[command(subcommand)]
        action: commands::events::EventsAction,
    },
    /// Student directory
    Students {
        #[command(subcommand)]
        action: commands::students::StudentsAction,
    },
    /// Follow an open lesson's scan events live
    Watch(commands::watch::WatchArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_url = cli.base_url.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args, base_url).await,
        Commands::Lesson { action } => commands::lesson::run(action, base_url).await,
        Commands::Attendance { action } => commands::attendance::run(action, base_url).await,
        Commands::Events { action } => commands::events::run(action, base_url).await,
        Commands::Students { action } => commands::students::run(action, base_url).await,
        Commands::Watch(args) => commands::watch::run(args, base_url).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
