//! # tsunami-lab CLI
//!
//! Command-line front end: standalone simulation runs, remote control
//! of a tsunami-lab server, and the middle-states sanity check.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tsunami-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a config file
    Run {
        /// Path to the runtime configuration file
        #[arg(short, long, default_value = "configs/config.json")]
        config: PathBuf,
    },

    /// Drive a remote tsunami-lab server
    Client {
        /// Server address as host:port
        address: String,

        #[command(subcommand)]
        action: commands::client::Action,
    },

    /// Verify the f-wave solver against middle-states reference data
    SanityCheck {
        /// Path to the reference CSV
        #[arg(long, default_value = "resources/middle_states.csv")]
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { config } => commands::run_simulation(&config),
        Commands::Client { address, action } => commands::run_client(&address, action, cli.verbose),
        Commands::SanityCheck { file } => commands::run_sanity_check(&file),
    }
}
