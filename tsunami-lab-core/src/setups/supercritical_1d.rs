//! Supercritical flow over a bump.

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// Steady supercritical channel flow over a submerged bump between x = 8
/// and x = 12. The shallow channel makes the Froude number exceed one
/// over the bump.
pub struct Supercritical1d {
    height: Real,
    momentum: Real,
}

impl Supercritical1d {
    pub fn new(height: Real, momentum: Real) -> Self {
        Self { height, momentum }
    }

    fn in_channel(x: Real) -> bool {
        (0.0..=25.0).contains(&x)
    }
}

impl Setup for Supercritical1d {
    fn get_height(&self, x: Real, y: Real) -> Real {
        if Self::in_channel(x) {
            -self.get_bathymetry(x, y)
        } else {
            self.height
        }
    }

    fn get_momentum_x(&self, x: Real, _y: Real) -> Real {
        if Self::in_channel(x) {
            0.18
        } else {
            self.momentum
        }
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_bathymetry(&self, x: Real, _y: Real) -> Real {
        if x > 8.0 && x < 12.0 {
            -0.13 - 0.05 * (x - 10.0) * (x - 10.0)
        } else {
            -0.33
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supercritical_1d() {
        let setup = Supercritical1d::new(0.0, 0.0);

        assert_eq!(setup.get_height(2.0, 0.0), 0.33);
        assert_eq!(setup.get_momentum_x(2.0, 0.0), 0.18);
        assert_eq!(setup.get_bathymetry(2.0, 0.0), -0.33);

        assert_eq!(setup.get_height(10.0, 0.0), 0.13);
        assert_eq!(setup.get_bathymetry(10.0, 0.0), -0.13);

        assert_eq!(setup.get_height(20.0, 0.0), 0.33);
        assert_eq!(setup.get_bathymetry(20.0, 0.0), -0.33);

        assert_eq!(setup.get_momentum_y(10.0, 0.0), 0.0);
    }
}
