mod commands;
mod util;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aegis", version, about = "Aegis risk-scoring engine — demo and operator CLI")]
struct Cli {
    /// Base URL of a running aegis-api instance
    #[arg(long, env = "AEGIS_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,

    /// POST an assessment request (file path, or "-" for stdin) to /assess
    Assess {
        /// Path to a JSON file shaped like the AssessRequest body, or "-" for stdin
        body: String,
        /// Use /assess/async instead of the synchronous endpoint
        #[arg(long)]
        r#async: bool,
    },

    /// Fetch an async assessment task by id
    Task { task_id: String },

    /// Account lifecycle operations
    Account {
        #[command(subcommand)]
        command: commands::account::AccountCommands,
    },

    /// Run a scripted end-to-end scenario against a fresh in-process engine
    /// (no API server required)
    Demo,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter("aegis_cli=info").init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Assess { body, r#async } => {
            commands::assess::run(&cli.api_url, &body, r#async).await
        }
        Commands::Task { task_id } => commands::assess::task(&cli.api_url, &task_id).await,
        Commands::Account { command } => commands::account::run(&cli.api_url, command).await,
        Commands::Demo => commands::demo::run(),
    };

    std::process::exit(code);
}
