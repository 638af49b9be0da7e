//! Rarefaction-rarefaction problem.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// Uniform water column with flow diverging from the discontinuity, which
/// produces two rarefaction waves.
pub struct RareRare1d {
    height: Real,
    momentum_left: Real,
    location_discontinuity: Real,
}

impl RareRare1d {
    pub fn new(height: Real, momentum_left: Real, location_discontinuity: Real) -> Self {
        Self {
            height,
            momentum_left,
            location_discontinuity,
        }
    }
}

impl Setup for RareRare1d {
    fn get_height(&self, _x: Real, _y: Real) -> Real {
        self.height
    }

    fn get_momentum_x(&self, x: Real, _y: Real) -> Real {
        if x <= self.location_discontinuity {
            -self.momentum_left
        } else {
            self.momentum_left
        }
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }
}
