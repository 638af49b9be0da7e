//! tsunami-lab-server: remote control daemon for the simulation engine.
//!
//! Binds a TCP port and serves one client at a time. Clients steer the
//! engine through the line-delimited JSON protocol.

mod cli;
mod server;
mod system_info;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsunami_lab_core::Simulator;

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let simulator = Arc::new(Simulator::new());
    simulator.set_base_dir(&cli.data_dir);

    server::serve(cli, simulator)
        .await
        .context("server terminated abnormally")
}
