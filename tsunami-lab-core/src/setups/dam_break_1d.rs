//! One-dimensional dam break.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// Two columns of water at rest, separated at the dam location.
pub struct DamBreak1d {
    height_left: Real,
    height_right: Real,
    location_dam: Real,
}

impl DamBreak1d {
    pub fn new(height_left: Real, height_right: Real, location_dam: Real) -> Self {
        Self {
            height_left,
            height_right,
            location_dam,
        }
    }
}

impl Setup for DamBreak1d {
    fn get_height(&self, x: Real, _y: Real) -> Real {
        if x < self.location_dam {
            self.height_left
        } else {
            self.height_right
        }
    }

    fn get_momentum_x(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }
}
