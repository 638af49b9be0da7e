//! Gridded input data as JSON files.
//!
//! A grid file carries two ascending coordinate axes and a row-major
//! value array, `{"x": [...], "y": [...], "z": [...]}`. Bathymetry and
//! displacement grids uploaded to the server use this format.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tsunami_lab_types::Real;

use crate::io::IoError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridData {
    pub x: Vec<Real>,
    pub y: Vec<Real>,
    pub z: Vec<Real>,
}

impl GridData {
    /// Value at the given axis indices, row-major with stride `x.len()`.
    pub fn value(&self, ix: usize, iy: usize) -> Option<Real> {
        if ix >= self.x.len() || iy >= self.y.len() {
            return None;
        }
        self.z.get(iy * self.x.len() + ix).copied()
    }

    fn validate(&self) -> Result<(), IoError> {
        if self.z.len() != self.x.len() * self.y.len() {
            return Err(IoError::Malformed(format!(
                "grid holds {} values for a {} x {} axis layout",
                self.z.len(),
                self.x.len(),
                self.y.len()
            )));
        }
        Ok(())
    }
}

pub fn read(path: impl AsRef<Path>) -> Result<GridData, IoError> {
    let file = File::open(path)?;
    let grid: GridData = serde_json::from_reader(BufReader::new(file))?;
    grid.validate()?;
    Ok(grid)
}

pub fn write(path: impl AsRef<Path>, grid: &GridData) -> Result<(), IoError> {
    grid.validate()?;
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), grid)?;
    Ok(())
}
