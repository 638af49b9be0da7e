//! Circular dam break on a flat bed.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// A cylindrical column of water centered at (50, 50) collapsing into
/// the surrounding lower water level.
pub struct CircularDamBreak2d;

impl CircularDamBreak2d {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CircularDamBreak2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for CircularDamBreak2d {
    fn get_height(&self, x: Real, y: Real) -> Real {
        let dx = x - 50.0;
        let dy = y - 50.0;
        if (dx * dx + dy * dy).sqrt() < 10.0 {
            10.0
        } else {
            5.0
        }
    }

    fn get_momentum_x(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }
}
