//! File formats of the solver: CSV output, bathymetry input, gridded
//! input data, station recordings, solution files and checkpoints.

pub mod bathymetry;
pub mod checkpoint;
pub mod csv;
pub mod grid_file;
pub mod solution;
pub mod station;

pub use bathymetry::BathymetryData;
pub use checkpoint::Checkpoint;
pub use grid_file::GridData;
pub use solution::SolutionWriter;
pub use station::Station;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read or write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed input data: {0}")]
    Malformed(String),
}
