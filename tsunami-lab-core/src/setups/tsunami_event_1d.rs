//! One-dimensional tsunami event over measured bathymetry.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use tsunami_lab_types::Real;

use crate::io::csv;
use crate::setups::{Setup, SetupError};

/// Spacing of the bathymetry samples in the input file, in meters.
const CELL_SIZE: Real = 250.0;

/// Minimum water depth and minimum bathymetry magnitude, in meters.
const DELTA: Real = 20.0;

/// Ocean at rest over a bathymetry profile read from a CSV cross-section,
/// perturbed by an initial vertical displacement of the sea floor.
///
/// Depths shallower than 20 m are clamped so the wet/dry logic of the
/// patches never has to deal with near-zero water columns.
pub struct TsunamiEvent1d {
    bathymetry: Vec<Real>,
}

impl TsunamiEvent1d {
    /// Loads the bathymetry profile from a CSV file whose fourth column
    /// holds the bathymetry in meters. Lines starting with `#` are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let contents = fs::read_to_string(path)?;
        Self::from_csv(&contents)
    }

    fn from_csv(contents: &str) -> Result<Self, SetupError> {
        let mut bathymetry = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields = csv::split_line(line, ',');
            let field = fields.get(3).ok_or_else(|| {
                SetupError::Malformed(format!("expected at least four columns, got: {line}"))
            })?;
            let value = field.parse::<Real>().map_err(|_| {
                SetupError::Malformed(format!("invalid bathymetry value: {field}"))
            })?;
            bathymetry.push(value);
        }
        Ok(Self { bathymetry })
    }

    fn bathymetry_from_data(&self, x: Real) -> Option<Real> {
        if x < 0.0 {
            return None;
        }
        let index = (x / CELL_SIZE) as usize;
        self.bathymetry.get(index).copied()
    }

    /// Vertical displacement of the sea floor. The input coordinate is in
    /// units of the 250 m sample spacing.
    fn displacement(x: Real) -> Real {
        let x = x * CELL_SIZE;
        if x > 175_000.0 && x < 250_000.0 {
            10.0 * (((x - 175_000.0) / 37_500.0) * PI + PI).sin()
        } else {
            0.0
        }
    }
}

impl Setup for TsunamiEvent1d {
    fn get_height(&self, x: Real, _y: Real) -> Real {
        match self.bathymetry_from_data(x) {
            Some(bathymetry) if bathymetry < 0.0 => (-bathymetry).max(DELTA),
            _ => 0.0,
        }
    }

    fn get_momentum_x(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_bathymetry(&self, x: Real, _y: Real) -> Real {
        let Some(bathymetry) = self.bathymetry_from_data(x) else {
            return 0.0;
        };
        let displacement = Self::displacement(x);
        if bathymetry < 0.0 {
            bathymetry.min(-DELTA) + displacement
        } else {
            bathymetry.max(DELTA) + displacement
        }
    }
}
