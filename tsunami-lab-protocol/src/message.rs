//! Wire messages.
//!
//! A message travels as one JSON array per line: `[type, key, args]`.
//! The strings in [`keys`] are the contract between client and server;
//! both sides dispatch on them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message key strings understood by the server and its clients.
pub mod keys {
    /// Connectivity probe. The acknowledgement is the answer.
    pub const CHECK: &str = "XCHECKX";

    // Server calls: operations on the server process itself.

    /// Stops the accept loop and exits the server.
    pub const SHUTDOWN_SERVER: &str = "shutdown_server";
    /// Prepares (if necessary) and runs the simulation.
    pub const START_SIMULATION: &str = "start_simulation";
    /// Aborts a running simulation at the next break point.
    pub const KILL_SIMULATION: &str = "kill_simulation";
    /// Holds the time loop without discarding state.
    pub const PAUSE_SIMULATION: &str = "pause_simulation";
    /// Resumes a paused time loop.
    pub const CONTINUE_SIMULATION: &str = "continue_simulation";
    /// Rebuilds the simulator binary. Args: `"ENV OPT"`.
    pub const COMPILE: &str = "compile";
    /// Rebuilds and relaunches the server through a shell script.
    pub const COMPILE_RUN_BASH: &str = "compile_run_bash";
    /// Rebuilds and relaunches the server through an sbatch job.
    pub const COMPILE_RUN_SBATCH: &str = "compile_run_sbatch";
    /// Resizes the server's receive buffer. Args: byte count.
    pub const SET_READ_BUFFER_SIZE: &str = "set_read_buffer_size";
    /// Resizes the server's send buffer. Args: byte count.
    pub const SET_SEND_BUFFER_SIZE: &str = "set_send_buffer_size";
    /// Uploads a bathymetry grid for the custom setup. Args: grid JSON.
    pub const SET_BATHYMETRY_DATA: &str = "set_bathymetry_data";
    /// Uploads a displacement grid for the custom setup. Args: grid JSON.
    pub const SET_DISPLACEMENT_DATA: &str = "set_displacement_data";

    // Function calls: operations forwarded to the simulator.

    /// Discards run state and re-prepares from the current config.
    pub const RESET_SIMULATOR: &str = "reset_simulator";
    /// Writes a checkpoint immediately.
    pub const WRITE_CHECKPOINT: &str = "write_checkpoint";
    /// Replaces the config from inline JSON. Args: config object.
    pub const LOAD_CONFIG_JSON: &str = "load_config_json";
    /// Replaces the config from a file on the server. Args: path.
    pub const LOAD_CONFIG_FILE: &str = "load_config_file";
    /// Switches file output on or off. Args: `"true"` or `"false"`.
    pub const TOGGLE_FILEIO: &str = "toggle_fileio";
    /// Asks for the current time step. Answer args: step count.
    pub const GET_CURRENT_TIMESTEP: &str = "get_current_timestep";
    /// Asks for the total number of time steps. Answer args: step count.
    pub const GET_MAX_TIMESTEPS: &str = "get_max_timesteps";
    /// Asks for cell counts, domain sizes and offsets. Answer args: object.
    pub const GET_SIMULATION_SIZES: &str = "get_simulation_sizes";
    /// Asks for the current water heights as a buffered transfer.
    pub const GET_HEIGHT_DATA: &str = "get_height_data";
    /// Asks for host RAM and per-core CPU usage. Answer args: object.
    pub const GET_SYSTEM_INFORMATION: &str = "get_system_information";
    /// Overrides the domain offset. Args: `"x y"`.
    pub const SET_OFFSET: &str = "set_offset";
    /// Overrides the cell counts. Args: `"nx ny"`.
    pub const SET_CELL_AMOUNT: &str = "set_cell_amount";
    /// Deletes all checkpoint files.
    pub const DELETE_CHECKPOINTS: &str = "delete_checkpoints";
    /// Removes all loaded stations.
    pub const DELETE_STATIONS: &str = "delete_stations";

    // Server responses.

    /// Marks the end of a buffered transfer.
    pub const BUFFERED_SEND_FINISHED: &str = "buff_send_finished";
}

/// Role of a message on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Client request handled by the server process itself.
    ServerCall,
    /// Client request forwarded to the simulator.
    FunctionCall,
    /// Answer sent by the server.
    ServerResponse,
    /// Anything else, including the placeholder default.
    Other,
}

/// One protocol message.
///
/// `args` carries whatever payload the key calls for; unused args stay
/// as the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub key: String,
    pub args: Value,
}

impl Message {
    /// Builds a server call for `key`.
    pub fn server_call(key: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::ServerCall,
            key: key.into(),
            args: Value::String(String::new()),
        }
    }

    /// Builds a function call for `key`.
    pub fn function_call(key: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::FunctionCall,
            key: key.into(),
            args: Value::String(String::new()),
        }
    }

    /// Builds a server response for `key`.
    pub fn server_response(key: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::ServerResponse,
            key: key.into(),
            args: Value::String(String::new()),
        }
    }

    /// Attaches a payload.
    pub fn with_args(mut self, args: impl Into<Value>) -> Self {
        self.args = args.into();
        self
    }

    /// The payload as plain text: strings unquoted, anything else as JSON.
    pub fn args_text(&self) -> String {
        match &self.args {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl Default for Message {
    fn default() -> Self {
        Self {
            message_type: MessageType::Other,
            key: "NONE".to_string(),
            args: Value::String(String::new()),
        }
    }
}

impl Serialize for Message {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (&self.message_type, &self.key, &self.args).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (message_type, key, args) = Deserialize::deserialize(deserializer)?;
        Ok(Self {
            message_type,
            key,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_as_array() {
        let message = Message::server_call(keys::CHECK);
        let line = serde_json::to_string(&message).unwrap();
        assert_eq!(line, r#"["server_call","XCHECKX",""]"#);
    }

    #[test]
    fn test_message_round_trip_keeps_args() {
        let message = Message::function_call(keys::LOAD_CONFIG_JSON)
            .with_args(serde_json::json!({"nx": 50, "setup": "DAMBREAK1D"}));
        let line = serde_json::to_string(&message).unwrap();
        let parsed: Message = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, message);
        assert_eq!(parsed.args["nx"], 50);
    }

    #[test]
    fn test_default_message_is_placeholder() {
        let message = Message::default();
        assert_eq!(message.message_type, MessageType::Other);
        assert_eq!(message.key, "NONE");
        assert_eq!(message.args_text(), "");
    }

    #[test]
    fn test_args_text_renders_numbers() {
        let message = Message::server_response(keys::GET_CURRENT_TIMESTEP).with_args(42);
        assert_eq!(message.args_text(), "42");
        assert_eq!(
            Message::server_call(keys::SET_READ_BUFFER_SIZE)
                .with_args("20000")
                .args_text(),
            "20000"
        );
    }

    #[test]
    fn test_malformed_line_fails() {
        assert!(serde_json::from_str::<Message>(r#"{"key": "XCHECKX"}"#).is_err());
        assert!(serde_json::from_str::<Message>(r#"["no_such_type","XCHECKX",""]"#).is_err());
    }
}
