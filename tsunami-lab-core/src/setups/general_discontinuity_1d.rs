//! General one-dimensional Riemann problem.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// Arbitrary left and right states for height and momentum, separated at
/// the discontinuity location.
pub struct GeneralDiscontinuity1d {
    height_left: Real,
    height_right: Real,
    momentum_left: Real,
    momentum_right: Real,
    location_discontinuity: Real,
}

impl GeneralDiscontinuity1d {
    pub fn new(
        height_left: Real,
        height_right: Real,
        momentum_left: Real,
        momentum_right: Real,
        location_discontinuity: Real,
    ) -> Self {
        Self {
            height_left,
            height_right,
            momentum_left,
            momentum_right,
            location_discontinuity,
        }
    }
}

impl Setup for GeneralDiscontinuity1d {
    fn get_height(&self, x: Real, _y: Real) -> Real {
        if x < self.location_discontinuity {
            self.height_left
        } else {
            self.height_right
        }
    }

    fn get_momentum_x(&self, x: Real, _y: Real) -> Real {
        if x < self.location_discontinuity {
            self.momentum_left
        } else {
            self.momentum_right
        }
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }
}
