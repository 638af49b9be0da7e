//! Subcritical flow over a bump.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// Steady subcritical channel flow over a submerged bump between x = 8
/// and x = 12. Inside the channel region 0 <= x <= 25 the surface is flat
/// and the momentum constant; outside, the constructor values apply.
pub struct Subcritical1d {
    height: Real,
    momentum: Real,
}

impl Subcritical1d {
    pub fn new(height: Real, momentum: Real) -> Self {
        Self { height, momentum }
    }

    fn in_channel(x: Real) -> bool {
        (0.0..=25.0).contains(&x)
    }
}

impl Setup for Subcritical1d {
    fn get_height(&self, x: Real, y: Real) -> Real {
        if Self::in_channel(x) {
            -self.get_bathymetry(x, y)
        } else {
            self.height
        }
    }

    fn get_momentum_x(&self, x: Real, _y: Real) -> Real {
        if Self::in_channel(x) {
            4.42
        } else {
            self.momentum
        }
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_bathymetry(&self, x: Real, _y: Real) -> Real {
        if x > 8.0 && x < 12.0 {
            -1.8 - 0.05 * (x - 10.0) * (x - 10.0)
        } else {
            -2.0
        }
    }
}
