//! Remote control commands.
//!
//! Each action opens a fresh connection, speaks the protocol, and
//! prints whatever the server answered.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use tsunami_lab_protocol::{keys, Communicator, Message};

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Probe whether the server is alive
    Check,
    /// Start the simulation
    Start,
    /// Abort the running simulation
    Kill,
    /// Pause the running simulation
    Pause,
    /// Continue a paused simulation
    Continue,
    /// Discard run state and re-prepare
    Reset,
    /// Stop the server
    Shutdown,
    /// Send a local config file's contents to the server
    LoadConfig {
        /// Config file to upload
        file: PathBuf,
    },
    /// Switch the server's file output on or off
    ToggleFileio {
        /// `on` or `off`
        state: String,
    },
    /// Print the current time step
    Timestep,
    /// Print the total number of time steps
    MaxTimesteps,
    /// Print cell counts, domain sizes and offsets
    Sizes,
    /// Fetch the height field
    HeightData {
        /// Write one value per line to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print host RAM and CPU usage
    SystemInfo,
    /// Rebuild the server binary
    Compile {
        /// Environment prefix for the build command
        #[arg(long, default_value = "")]
        env: String,
        /// Extra arguments appended to the build command
        #[arg(long, default_value = "")]
        opt: String,
    },
}

pub fn run_client(address: &str, action: Action, verbose: bool) -> Result<()> {
    let mut communicator =
        Communicator::connect(address).with_context(|| format!("failed to connect to {address}"))?;

    match action {
        Action::Check => {
            communicator.send_message(&Message::server_call(keys::CHECK))?;
            println!("server at {address} is alive");
        }
        Action::Start => {
            communicator.send_message(&Message::server_call(keys::START_SIMULATION))?;
        }
        Action::Kill => {
            communicator.send_message(&Message::server_call(keys::KILL_SIMULATION))?;
        }
        Action::Pause => {
            communicator.send_message(&Message::server_call(keys::PAUSE_SIMULATION))?;
        }
        Action::Continue => {
            communicator.send_message(&Message::server_call(keys::CONTINUE_SIMULATION))?;
        }
        Action::Reset => {
            communicator.send_message(&Message::function_call(keys::RESET_SIMULATOR))?;
        }
        Action::Shutdown => {
            communicator.send_message(&Message::server_call(keys::SHUTDOWN_SERVER))?;
        }
        Action::LoadConfig { file } => {
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let config: serde_json::Value = serde_json::from_str(&contents)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            communicator
                .send_message(&Message::function_call(keys::LOAD_CONFIG_JSON).with_args(config))?;
        }
        Action::ToggleFileio { state } => {
            let enabled = match state.as_str() {
                "on" => "true",
                "off" => "false",
                other => bail!("expected on or off, got {other}"),
            };
            communicator
                .send_message(&Message::function_call(keys::TOGGLE_FILEIO).with_args(enabled))?;
        }
        Action::Timestep => {
            communicator.send_message(&Message::function_call(keys::GET_CURRENT_TIMESTEP))?;
            println!("{}", communicator.receive_message()?.args_text());
        }
        Action::MaxTimesteps => {
            communicator.send_message(&Message::function_call(keys::GET_MAX_TIMESTEPS))?;
            println!("{}", communicator.receive_message()?.args_text());
        }
        Action::Sizes => {
            communicator.send_message(&Message::function_call(keys::GET_SIMULATION_SIZES))?;
            let response = communicator.receive_message()?;
            println!("{}", serde_json::to_string_pretty(&response.args)?);
        }
        Action::HeightData { output } => {
            communicator.send_message(&Message::function_call(keys::GET_HEIGHT_DATA))?;
            let data = communicator.receive_buffered()?;
            match output {
                Some(path) => {
                    let count = data.split(',').count();
                    let mut contents = data.replace(',', "\n");
                    contents.push('\n');
                    fs::write(&path, contents)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {count} values to {}", path.display());
                }
                None => println!("{data}"),
            }
        }
        Action::SystemInfo => {
            communicator.send_message(&Message::function_call(keys::GET_SYSTEM_INFORMATION))?;
            let response = communicator.receive_message()?;
            println!("{}", serde_json::to_string_pretty(&response.args)?);
        }
        Action::Compile { env, opt } => {
            let args = serde_json::json!({ "ENV": env, "OPT": opt });
            communicator.send_message(&Message::server_call(keys::COMPILE).with_args(args))?;
        }
    }

    if verbose {
        print!("{}", communicator.log());
    }
    Ok(())
}
