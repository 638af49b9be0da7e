//! Simulation checkpoints.
//!
//! A checkpoint is a JSON snapshot of the patch interior together with
//! the engine counters, written periodically so a killed run can pick
//! up where it stopped.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tsunami_lab_types::Real;

use crate::io::IoError;
use crate::patches::WavePropagation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub nx: usize,
    pub ny: usize,
    pub size_x: Real,
    pub size_y: Real,
    pub offset_x: Real,
    pub offset_y: Real,
    pub sim_time: Real,
    pub time_step: usize,
    pub frames_written: usize,
    pub h_max: Real,
    pub height: Vec<Real>,
    pub momentum_x: Vec<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum_y: Option<Vec<Real>>,
    pub bathymetry: Vec<Real>,
}

impl Checkpoint {
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        self.validate()?;
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path)?;
        let checkpoint: Checkpoint = serde_json::from_reader(BufReader::new(file))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Restores the snapshotted interior into a patch of matching size.
    pub fn apply(&self, patch: &mut dyn WavePropagation) {
        for iy in 0..self.ny {
            for ix in 0..self.nx {
                let cell = iy * self.nx + ix;
                patch.set_height(ix, iy, self.height[cell]);
                patch.set_momentum_x(ix, iy, self.momentum_x[cell]);
                if let Some(momentum_y) = &self.momentum_y {
                    patch.set_momentum_y(ix, iy, momentum_y[cell]);
                }
                patch.set_bathymetry(ix, iy, self.bathymetry[cell]);
            }
        }
    }

    fn validate(&self) -> Result<(), IoError> {
        let cells = self.nx * self.ny;
        let lengths = [
            self.height.len(),
            self.momentum_x.len(),
            self.momentum_y.as_ref().map_or(cells, Vec::len),
            self.bathymetry.len(),
        ];
        if lengths.iter().any(|&length| length != cells) {
            return Err(IoError::Malformed(format!(
                "checkpoint arrays do not match {} x {} cells",
                self.nx, self.ny
            )));
        }
        Ok(())
    }
}

/// Copies the `nx` x `ny` interior out of a strided ghost-free view.
pub fn interior_values(values: &[Real], stride: usize, nx: usize, ny: usize) -> Vec<Real> {
    let mut out = Vec::with_capacity(nx * ny);
    for iy in 0..ny {
        out.extend_from_slice(&values[iy * stride..iy * stride + nx]);
    }
    out
}
