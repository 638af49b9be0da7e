//! Accept loop and message dispatch.
//!
//! One client is served at a time. Every received line is acknowledged
//! with `OK`, then dispatched by message key. Engine work that blocks
//! runs on `spawn_blocking` so queries stay responsive mid-simulation.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use tsunami_lab_core::{Simulator, SimulatorError};
use tsunami_lab_protocol::{keys, Message, DEFAULT_READ_BUFFER_SIZE};
use tsunami_lab_types::Real;

use crate::cli::Cli;
use crate::system_info;

const DEFAULT_SEND_BUFFER_SIZE: usize = 8096;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to serve a client connection: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode a message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to drive the simulator: {0}")]
    Simulator(#[from] SimulatorError),
    #[error("Failed to join a blocking task: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Malformed arguments {args:?} for {key}")]
    InvalidArguments { key: String, args: String },
}

enum Outcome {
    Disconnected,
    Shutdown,
}

/// Binds the configured port and serves clients until shutdown.
pub async fn serve(cli: Cli, simulator: Arc<Simulator>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    info!(port = cli.port, "tsunami-lab server listening");
    run(listener, cli, simulator).await
}

async fn run(listener: TcpListener, cli: Cli, simulator: Arc<Simulator>) -> Result<(), ServerError> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!(peer = %peer, "client connected");
        match handle_client(stream, &cli, &simulator).await {
            Ok(Outcome::Disconnected) => info!("client disconnected"),
            Ok(Outcome::Shutdown) => break,
            Err(error) => warn!(error = %error, "client session ended with error"),
        }
    }
    info!("shutting down");
    simulator.set_should_exit(true);
    Ok(())
}

async fn handle_client(
    stream: TcpStream,
    cli: &Cli,
    simulator: &Arc<Simulator>,
) -> Result<Outcome, ServerError> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::with_capacity(DEFAULT_READ_BUFFER_SIZE, read_half);
    let mut writer = write_half;
    let mut send_buffer_size = DEFAULT_SEND_BUFFER_SIZE;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(Outcome::Disconnected);
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        writer.write_all(b"OK\n").await?;

        let message: Message = match serde_json::from_str(trimmed) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "discarding unparseable line");
                continue;
            }
        };
        debug!(key = %message.key, "dispatching");

        if message.key == keys::SET_READ_BUFFER_SIZE {
            // Rebuilding drops buffered bytes; clients resize between
            // exchanges only.
            match parse_size(&message) {
                Ok(size) => {
                    reader = BufReader::with_capacity(size, reader.into_inner());
                    info!(bytes = size, "receive buffer resized");
                }
                Err(error) => warn!(error = %error, "ignoring buffer resize"),
            }
            continue;
        }

        match dispatch(&mut writer, &mut send_buffer_size, &message, cli, simulator).await {
            Ok(Some(outcome)) => return Ok(outcome),
            Ok(None) => {}
            Err(error) => warn!(key = %message.key, error = %error, "request failed"),
        }
    }
}

async fn dispatch(
    writer: &mut OwnedWriteHalf,
    send_buffer_size: &mut usize,
    message: &Message,
    cli: &Cli,
    simulator: &Arc<Simulator>,
) -> Result<Option<Outcome>, ServerError> {
    match message.key.as_str() {
        keys::CHECK => {}
        keys::SHUTDOWN_SERVER => {
            info!("client requested shutdown");
            return Ok(Some(Outcome::Shutdown));
        }
        keys::START_SIMULATION => start_simulation(simulator),
        keys::KILL_SIMULATION => {
            info!("killing simulation");
            simulator.set_should_exit(true);
        }
        keys::PAUSE_SIMULATION => {
            info!("pausing simulation");
            simulator.set_paused(true);
        }
        keys::CONTINUE_SIMULATION => {
            info!("continuing simulation");
            simulator.set_paused(false);
        }
        keys::RESET_SIMULATOR => {
            info!("resetting simulator");
            let simulator = Arc::clone(simulator);
            tokio::task::spawn_blocking(move || simulator.reset()).await??;
        }
        keys::WRITE_CHECKPOINT => {
            let simulator = Arc::clone(simulator);
            tokio::task::spawn_blocking(move || simulator.write_checkpoint()).await??;
        }
        keys::LOAD_CONFIG_JSON => simulator.load_config_json(message.args.clone())?,
        keys::LOAD_CONFIG_FILE => {
            let simulator = Arc::clone(simulator);
            let path = message.args_text();
            tokio::task::spawn_blocking(move || simulator.load_config_file(path)).await??;
        }
        keys::TOGGLE_FILEIO => {
            let enabled = match message.args_text().as_str() {
                "true" => true,
                "false" => false,
                other => return Err(invalid_args(&message.key, other)),
            };
            info!(enabled, "toggling file output");
            simulator.set_file_io(enabled);
        }
        keys::SET_CELL_AMOUNT => {
            let (nx, ny) = parse_pair::<usize>(message)?;
            simulator.set_cell_amount(nx, ny);
        }
        keys::SET_OFFSET => {
            let (offset_x, offset_y) = parse_pair::<Real>(message)?;
            simulator.set_offset(offset_x, offset_y);
        }
        keys::SET_BATHYMETRY_DATA => {
            let path = store_upload(cli, "bathymetry.json", &message.args).await?;
            simulator.set_bathymetry_file_path(path);
        }
        keys::SET_DISPLACEMENT_DATA => {
            let path = store_upload(cli, "displacement.json", &message.args).await?;
            simulator.set_displacement_file_path(path);
        }
        keys::SET_SEND_BUFFER_SIZE => {
            let size = parse_size(message)?;
            *send_buffer_size = size;
            info!(bytes = size, "send buffer resized");
        }
        keys::GET_CURRENT_TIMESTEP => {
            let response = Message::server_response(keys::GET_CURRENT_TIMESTEP)
                .with_args(simulator.current_time_step());
            send_message(writer, &response).await?;
        }
        keys::GET_MAX_TIMESTEPS => {
            let response = Message::server_response(keys::GET_MAX_TIMESTEPS)
                .with_args(simulator.max_time_steps());
            send_message(writer, &response).await?;
        }
        keys::GET_SIMULATION_SIZES => {
            let response = Message::server_response(keys::GET_SIMULATION_SIZES)
                .with_args(serde_json::to_value(simulator.domain_info())?);
            send_message(writer, &response).await?;
        }
        keys::GET_HEIGHT_DATA => {
            send_height_data(writer, *send_buffer_size, simulator).await?;
        }
        keys::GET_SYSTEM_INFORMATION => {
            let response = Message::server_response(keys::GET_SYSTEM_INFORMATION)
                .with_args(serde_json::to_value(system_info::snapshot())?);
            send_message(writer, &response).await?;
        }
        keys::COMPILE => compile(cli, &message.args).await?,
        keys::COMPILE_RUN_BASH => {
            relaunch(cli, &message.args, LaunchMode::Bash).await?;
            return Ok(Some(Outcome::Shutdown));
        }
        keys::COMPILE_RUN_SBATCH => {
            relaunch(cli, &message.args, LaunchMode::Sbatch).await?;
            return Ok(Some(Outcome::Shutdown));
        }
        keys::DELETE_CHECKPOINTS => simulator.delete_checkpoints()?,
        keys::DELETE_STATIONS => simulator.delete_stations(),
        other => warn!(key = other, "unknown message key"),
    }
    Ok(None)
}

fn start_simulation(simulator: &Arc<Simulator>) {
    if simulator.is_calculating() {
        warn!("simulation is already running");
        return;
    }
    info!("starting simulation");
    simulator.set_should_exit(false);
    let simulator = Arc::clone(simulator);
    tokio::task::spawn_blocking(move || {
        if let Err(error) = simulator.run() {
            warn!(error = %error, "simulation run failed");
        }
    });
}

async fn send_message(writer: &mut OwnedWriteHalf, message: &Message) -> Result<(), ServerError> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    Ok(())
}

/// Streams the interior heights as comma-joined chunks of at most
/// `send_buffer_size` bytes, ending with the finished marker.
async fn send_height_data(
    writer: &mut OwnedWriteHalf,
    send_buffer_size: usize,
    simulator: &Simulator,
) -> Result<(), ServerError> {
    match simulator.height_data() {
        Some(heights) => {
            let joined = heights
                .iter()
                .map(|height| height.to_string())
                .collect::<Vec<_>>()
                .join(",");
            debug!(
                cells = heights.len(),
                bytes = joined.len(),
                "streaming height data"
            );
            for chunk in joined.as_bytes().chunks(send_buffer_size.max(1)) {
                let chunk = String::from_utf8_lossy(chunk);
                let response =
                    Message::server_response(keys::GET_HEIGHT_DATA).with_args(chunk.as_ref());
                send_message(writer, &response).await?;
            }
        }
        None => warn!("no height data available"),
    }
    send_message(writer, &Message::server_response(keys::BUFFERED_SEND_FINISHED)).await?;
    Ok(())
}

async fn store_upload(cli: &Cli, file_name: &str, args: &Value) -> Result<PathBuf, ServerError> {
    let uploads = cli.data_dir.join("uploads");
    tokio::fs::create_dir_all(&uploads).await?;
    let path = uploads.join(file_name);
    tokio::fs::write(&path, serde_json::to_vec(args)?).await?;
    info!(path = %path.display(), "stored uploaded grid");
    Ok(path)
}

#[derive(Debug, Default, Deserialize)]
struct CompileArgs {
    #[serde(rename = "ENV", default)]
    env: String,
    #[serde(rename = "OPT", default)]
    opt: String,
}

impl CompileArgs {
    fn from_value(args: &Value) -> Self {
        serde_json::from_value(args.clone()).unwrap_or_default()
    }

    fn command_line(&self, build_command: &str) -> String {
        let mut line = String::new();
        if !self.env.is_empty() {
            line.push_str(&self.env);
            line.push(' ');
        }
        line.push_str(build_command);
        if !self.opt.is_empty() {
            line.push(' ');
            line.push_str(&self.opt);
        }
        line
    }
}

async fn compile(cli: &Cli, args: &Value) -> Result<(), ServerError> {
    let command_line = CompileArgs::from_value(args).command_line(&cli.build_command);
    info!(command = %command_line, "rebuilding");
    let status = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&command_line)
        .status()
        .await?;
    if status.success() {
        info!("rebuild finished");
    } else {
        warn!(status = %status, "rebuild failed");
    }
    Ok(())
}

enum LaunchMode {
    Bash,
    Sbatch,
}

/// Writes a script that rebuilds and restarts the server, spawns it,
/// and leaves shutting down to the caller.
async fn relaunch(cli: &Cli, args: &Value, mode: LaunchMode) -> Result<(), ServerError> {
    let command_line = CompileArgs::from_value(args).command_line(&cli.build_command);
    let server = std::env::current_exe()?;
    let restart = format!("{} --port {}", server.display(), cli.port);
    let (script_path, script, runner) = match mode {
        LaunchMode::Bash => (
            cli.data_dir.join("run_server.sh"),
            format!("#!/bin/bash\n{command_line}\n{restart}\n"),
            "bash",
        ),
        LaunchMode::Sbatch => (
            cli.data_dir.join("run_server.sbatch"),
            format!(
                "#!/bin/bash\n\
                 #SBATCH --job-name=tsunami_lab_server\n\
                 #SBATCH --output=server.log\n\
                 #SBATCH --nodes=1\n\
                 {command_line}\n\
                 {restart}\n"
            ),
            "sbatch",
        ),
    };
    tokio::fs::write(&script_path, script).await?;
    info!(script = %script_path.display(), runner, "relaunching through script");
    tokio::process::Command::new(runner).arg(&script_path).spawn()?;
    Ok(())
}

fn parse_size(message: &Message) -> Result<usize, ServerError> {
    let text = message.args_text();
    text.trim()
        .parse()
        .map_err(|_| invalid_args(&message.key, &text))
}

fn parse_pair<T: std::str::FromStr>(message: &Message) -> Result<(T, T), ServerError> {
    let text = message.args_text();
    let mut parts = text.split_whitespace();
    let (Some(first), Some(second)) = (parts.next(), parts.next()) else {
        return Err(invalid_args(&message.key, &text));
    };
    match (first.parse(), second.parse()) {
        (Ok(first), Ok(second)) => Ok((first, second)),
        _ => Err(invalid_args(&message.key, &text)),
    }
}

fn invalid_args(key: &str, args: &str) -> ServerError {
    ServerError::InvalidArguments {
        key: key.to_string(),
        args: args.to_string(),
    }
}
