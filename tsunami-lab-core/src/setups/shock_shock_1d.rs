//! Shock-shock problem.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// Uniform water column with flow converging at the discontinuity, which
/// produces two shock waves.
pub struct ShockShock1d {
    height: Real,
    momentum_left: Real,
    location_discontinuity: Real,
}

impl ShockShock1d {
    pub fn new(height: Real, momentum_left: Real, location_discontinuity: Real) -> Self {
        Self {
            height,
            momentum_left,
            location_discontinuity,
        }
    }
}

impl Setup for ShockShock1d {
    fn get_height(&self, _x: Real, _y: Real) -> Real {
        self.height
    }

    fn get_momentum_x(&self, x: Real, _y: Real) -> Real {
        if x <= self.location_discontinuity {
            self.momentum_left
        } else {
            -self.momentum_left
        }
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shock_shock_1d() {
        let setup = ShockShock1d::new(20.0, 10.0, 5.0);

        assert_eq!(setup.get_height(2.0, 0.0), 20.0);
        assert_eq!(setup.get_momentum_x(2.0, 0.0), 10.0);
        assert_eq!(setup.get_momentum_y(2.0, 0.0), 0.0);

        assert_eq!(setup.get_height(8.0, 0.0), 20.0);
        assert_eq!(setup.get_momentum_x(8.0, 0.0), -10.0);
        assert_eq!(setup.get_momentum_y(8.0, 0.0), 0.0);
    }
}
