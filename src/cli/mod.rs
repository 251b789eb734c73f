//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod detail;
pub mod locate;
pub mod search;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

/// Map-based landmark discovery
#[derive(Parser)]
#[command(name = "geomarks")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for landmarks near a coordinate
    Search(search::SearchArgs),

    /// Show the detail record for one landmark
    Detail(detail::DetailArgs),

    /// Locate this device and search around it (needs a running server)
    Locate(locate::LocateArgs),

    /// Start the proxy server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Detail(args) => detail::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}
