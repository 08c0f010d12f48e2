//! micswitch CLI
//!
//! Stdout always carries a single JSON object; logs go to stderr.

use clap::{Parser, Subcommand};
use micswitch_app::presentation::cli::{
    config_command, list_command, query_command, switch_command, CliResponse,
};
use micswitch_app::Container;
use micswitch_core::domain::config::{Config, ConfigManager};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "micswitch")]
#[command(about = "List microphones and switch the default audio input", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List input sources as JSON
    List {
        /// Case-insensitive filter on source names
        #[arg(default_value = "")]
        query: String,

        /// Maximum number of sources (defaults to max_sources_display)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Make a source the default input and move active streams to it
    Switch {
        /// Source name as printed by `list`
        name: String,
    },
    /// Launcher result items for a search string
    Query {
        #[arg(default_value = "")]
        text: String,
    },
    /// Print the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<Config, String> {
    let manager = match path {
        Some(path) => ConfigManager::new(path),
        None => ConfigManager::with_default_path().map_err(|e| e.to_string())?,
    };
    manager.load().map_err(|e| e.to_string())
}

fn emit(response: &CliResponse) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.render().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or("invalid arguments")
                .trim_start_matches("error: ");
            emit(&CliResponse::error(message, 2))?;
            std::process::exit(2);
        }
    };

    init_logging(cli.verbose);
    tracing::debug!("micswitch starting");

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(message) => {
            emit(&CliResponse::error(message, 1))?;
            std::process::exit(1);
        }
    };

    let container = Container::new(config);
    let response = match cli.command {
        Commands::List { query, limit } => {
            let limit = limit.unwrap_or(container.config().max_sources_display() as i64);
            list_command(&container, &query, limit).await
        }
        Commands::Switch { name } => switch_command(&container, &name).await,
        Commands::Query { text } => query_command(&container, &text).await,
        Commands::Config => config_command(&container),
    };

    emit(&response)?;
    std::process::exit(response.exit_code);
}
