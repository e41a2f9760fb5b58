//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod interactive;
pub mod search;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Kilometer point search for the Spanish road network
#[derive(Parser)]
#[command(name = "pk-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search kilometer points for a road
    Search(search::SearchArgs),

    /// Line-driven search form with a clear action
    Interactive(interactive::InteractiveArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Interactive(args) => interactive::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Log to stderr so stdout only carries results
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Echo every non-empty status message to stderr until the controller goes away
pub(crate) fn spawn_status_printer(mut status: watch::Receiver<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let text = status.borrow_and_update().clone();
            if !text.is_empty() {
                eprintln!("{}", text);
            }
        }
    })
}
