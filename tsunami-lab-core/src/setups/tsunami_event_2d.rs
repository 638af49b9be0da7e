//! Two-dimensional tsunami event over gridded bathymetry.

use std::path::Path;

use tsunami_lab_types::Real;

use crate::io::grid_file::{self, GridData};
use crate::setups::Setup;

/// Minimum water depth and minimum bathymetry magnitude, in meters.
const DELTA: Real = 20.0;

/// Ocean at rest over a gridded bathymetry, perturbed by a gridded
/// vertical displacement of the sea floor.
///
/// Both grids are sampled with nearest-neighbor lookups on their
/// ascending coordinate axes. Queries outside a grid's bounding box
/// evaluate to zero, so a localized displacement patch leaves the rest
/// of the domain untouched.
pub struct TsunamiEvent2d {
    bathymetry: Option<GridData>,
    displacement: Option<GridData>,
}

impl TsunamiEvent2d {
    /// Loads the bathymetry and displacement grids. A grid that cannot
    /// be read is logged and treated as zero everywhere.
    pub fn new(bathymetry_path: impl AsRef<Path>, displacement_path: impl AsRef<Path>) -> Self {
        Self {
            bathymetry: load_grid(bathymetry_path.as_ref(), "bathymetry"),
            displacement: load_grid(displacement_path.as_ref(), "displacement"),
        }
    }

    fn bathymetry_from_data(&self, x: Real, y: Real) -> Real {
        self.bathymetry.as_ref().map_or(0.0, |grid| sample(grid, x, y))
    }

    fn displacement_from_data(&self, x: Real, y: Real) -> Real {
        self.displacement.as_ref().map_or(0.0, |grid| sample(grid, x, y))
    }
}

impl Setup for TsunamiEvent2d {
    fn get_height(&self, x: Real, y: Real) -> Real {
        let bathymetry = self.bathymetry_from_data(x, y);
        if bathymetry < 0.0 {
            (-bathymetry).max(DELTA)
        } else {
            0.0
        }
    }

    fn get_momentum_x(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_bathymetry(&self, x: Real, y: Real) -> Real {
        let bathymetry = self.bathymetry_from_data(x, y);
        let displacement = self.displacement_from_data(x, y);
        if bathymetry < 0.0 {
            bathymetry.min(-DELTA) + displacement
        } else {
            bathymetry.max(DELTA) + displacement
        }
    }
}

fn load_grid(path: &Path, role: &str) -> Option<GridData> {
    match grid_file::read(path) {
        Ok(grid) => Some(grid),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "Failed to read {role} grid, sampling it as zero"
            );
            None
        }
    }
}

fn sample(grid: &GridData, x: Real, y: Real) -> Real {
    let Some(ix) = nearest_index(&grid.x, x) else {
        return 0.0;
    };
    let Some(iy) = nearest_index(&grid.y, y) else {
        return 0.0;
    };
    grid.value(ix, iy).unwrap_or(0.0)
}

/// Index of the sample closest to `coordinate` on an ascending axis, or
/// `None` if the coordinate falls outside the axis range. Ties go to the
/// upper index.
fn nearest_index(axis: &[Real], coordinate: Real) -> Option<usize> {
    let first = *axis.first()?;
    let last = *axis.last()?;
    if coordinate < first || coordinate > last {
        return None;
    }
    let upper = axis.partition_point(|&value| value < coordinate);
    if upper == 0 {
        return Some(0);
    }
    if upper == axis.len() {
        return Some(axis.len() - 1);
    }
    if coordinate - axis[upper - 1] < axis[upper] - coordinate {
        Some(upper - 1)
    } else {
        Some(upper)
    }
}
