use std::path::PathBuf;

use clap::Parser;

/// CLI for the remote control server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tsunami-lab-server",
    about = "Remote control server for tsunami-lab simulations"
)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "TSUNAMI_LAB_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory for configs, uploads, and simulation output
    #[arg(long, env = "TSUNAMI_LAB_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Command used to rebuild the server on compile requests
    #[arg(
        long,
        env = "TSUNAMI_LAB_BUILD_COMMAND",
        default_value = "cargo build --release"
    )]
    pub build_command: String,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
