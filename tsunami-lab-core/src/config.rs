//! Simulation configuration.
//!
//! Configs are JSON with camelCase keys; every field falls back to a
//! default, so `{}` is a valid config describing a small circular dam
//! break.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsunami_lab_types::{Boundary, CellIdx, Real};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    #[serde(default = "default_solver")]
    pub solver: String,

    /// Setup name, matched case-insensitively against the setup catalog.
    #[serde(default = "default_setup")]
    pub setup: String,

    #[serde(default = "default_cells")]
    pub nx: CellIdx,

    #[serde(default = "default_cells")]
    pub ny: CellIdx,

    /// Output coarsening factor: frames average blocks of `nk` x `nk` cells.
    #[serde(default = "default_cells")]
    pub nk: CellIdx,

    #[serde(default = "default_size_x")]
    pub simulation_size_x: Real,

    #[serde(default = "default_size_y")]
    pub simulation_size_y: Real,

    #[serde(default)]
    pub offset_x: Real,

    #[serde(default)]
    pub offset_y: Real,

    #[serde(default = "default_end_time")]
    pub end_time: Real,

    #[serde(default)]
    pub boundary_l: Boundary,

    #[serde(default)]
    pub boundary_r: Boundary,

    #[serde(default)]
    pub boundary_t: Boundary,

    #[serde(default)]
    pub boundary_b: Boundary,

    /// Optional bathymetry overlay file applied after the setup sampling.
    #[serde(default)]
    pub bathymetry: Option<PathBuf>,

    /// Optional displacement grid for the custom tsunami event.
    #[serde(default)]
    pub displacement: Option<PathBuf>,

    /// A frame is written every this many time steps.
    #[serde(default = "default_writing_frequency")]
    pub writing_frequency: usize,

    /// Wall-clock seconds between checkpoints; non-positive disables them.
    #[serde(default = "default_checkpoint_frequency")]
    pub checkpoint_frequency: Real,

    /// Simulated seconds between station captures.
    #[serde(default = "default_station_frequency")]
    pub station_frequency: Real,

    #[serde(default)]
    pub output_method: OutputMethod,

    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,

    #[serde(default)]
    pub stations: Vec<StationConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMethod {
    #[default]
    Jsonl,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationConfig {
    pub name: String,

    #[serde(default)]
    pub loc_x: Real,

    #[serde(default)]
    pub loc_y: Real,
}

impl SimulatorConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The setup name normalized for catalog lookup.
    pub fn setup_choice(&self) -> String {
        self.setup.trim().to_uppercase()
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            solver: default_solver(),
            setup: default_setup(),
            nx: default_cells(),
            ny: default_cells(),
            nk: default_cells(),
            simulation_size_x: default_size_x(),
            simulation_size_y: default_size_y(),
            offset_x: 0.0,
            offset_y: 0.0,
            end_time: default_end_time(),
            boundary_l: Boundary::default(),
            boundary_r: Boundary::default(),
            boundary_t: Boundary::default(),
            boundary_b: Boundary::default(),
            bathymetry: None,
            displacement: None,
            writing_frequency: default_writing_frequency(),
            checkpoint_frequency: default_checkpoint_frequency(),
            station_frequency: default_station_frequency(),
            output_method: OutputMethod::default(),
            output_file_name: default_output_file_name(),
            stations: Vec::new(),
        }
    }
}

fn default_solver() -> String {
    "fwave".to_string()
}

fn default_setup() -> String {
    "CIRCULARDAMBREAK2D".to_string()
}

fn default_cells() -> CellIdx {
    1
}

fn default_size_x() -> Real {
    10.0
}

fn default_size_y() -> Real {
    1.0
}

fn default_end_time() -> Real {
    20.0
}

fn default_writing_frequency() -> usize {
    80
}

fn default_checkpoint_frequency() -> Real {
    -1.0
}

fn default_station_frequency() -> Real {
    1.0
}

fn default_output_file_name() -> String {
    "solution".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SimulatorConfig::from_json_str("{}").unwrap();

        assert_eq!(config.solver, "fwave");
        assert_eq!(config.setup, "CIRCULARDAMBREAK2D");
        assert_eq!(config.nx, 1);
        assert_eq!(config.ny, 1);
        assert_eq!(config.nk, 1);
        assert_eq!(config.simulation_size_x, 10.0);
        assert_eq!(config.simulation_size_y, 1.0);
        assert_eq!(config.offset_x, 0.0);
        assert_eq!(config.offset_y, 0.0);
        assert_eq!(config.end_time, 20.0);
        assert_eq!(config.boundary_l, Boundary::Outflow);
        assert_eq!(config.boundary_r, Boundary::Outflow);
        assert_eq!(config.boundary_t, Boundary::Outflow);
        assert_eq!(config.boundary_b, Boundary::Outflow);
        assert_eq!(config.bathymetry, None);
        assert_eq!(config.displacement, None);
        assert_eq!(config.writing_frequency, 80);
        assert_eq!(config.checkpoint_frequency, -1.0);
        assert_eq!(config.station_frequency, 1.0);
        assert_eq!(config.output_method, OutputMethod::Jsonl);
        assert_eq!(config.output_file_name, "solution");
        assert!(config.stations.is_empty());
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "solver": "fwave",
            "setup": "TOHOKU",
            "nx": 2700,
            "ny": 1500,
            "nk": 5,
            "simulationSizeX": 2700000,
            "simulationSizeY": 1500000,
            "offsetX": -199875,
            "offsetY": -749875,
            "endTime": 13000,
            "boundaryL": "WALL",
            "boundaryR": "outflow",
            "bathymetry": "data/tohoku_bathymetry.json",
            "writingFrequency": 100,
            "checkpointFrequency": 30,
            "stationFrequency": 60,
            "outputMethod": "csv",
            "outputFileName": "tohoku",
            "stations": [
                { "name": "soma", "locX": 53000, "locY": 17000 }
            ]
        }"#;
        let config = SimulatorConfig::from_json_str(json).unwrap();

        assert_eq!(config.setup, "TOHOKU");
        assert_eq!(config.nx, 2700);
        assert_eq!(config.boundary_l, Boundary::Wall);
        assert_eq!(config.boundary_r, Boundary::Outflow);
        assert_eq!(config.boundary_t, Boundary::Outflow);
        assert_eq!(
            config.bathymetry.as_deref(),
            Some(Path::new("data/tohoku_bathymetry.json"))
        );
        assert_eq!(config.checkpoint_frequency, 30.0);
        assert_eq!(config.output_method, OutputMethod::Csv);
        assert_eq!(config.stations.len(), 1);
        assert_eq!(config.stations[0].name, "soma");
        assert_eq!(config.stations[0].loc_x, 53000.0);
        assert_eq!(config.stations[0].loc_y, 17000.0);
    }

    #[test]
    fn test_setup_choice_is_normalized() {
        let config = SimulatorConfig::from_json_str(r#"{"setup": " chile "}"#).unwrap();
        assert_eq!(config.setup_choice(), "CHILE");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"nx": 50, "ny": 50, "setup": "CIRCULARDAMBREAK2D"}"#).unwrap();

        let config = SimulatorConfig::from_file(&path).unwrap();
        assert_eq!(config.nx, 50);
        assert_eq!(config.ny, 50);

        assert!(SimulatorConfig::from_file(dir.path().join("missing.json")).is_err());
        fs::write(&path, "{not json").unwrap();
        assert!(SimulatorConfig::from_file(&path).is_err());
    }
}
