//! Artificial tsunami over an idealized ocean floor.

use std::f64::consts::PI;

use tsunami_lab_types::Real;

use crate::setups::Setup;

/// A 100 m deep ocean at rest whose floor is displaced inside the square
/// [-500, 500] x [-500, 500] by a smooth sine-parabola hump.
pub struct ArtificialTsunami2d;

impl ArtificialTsunami2d {
    pub fn new() -> Self {
        Self
    }

    fn displacement(x: Real, y: Real) -> Real {
        if (-500.0..=500.0).contains(&x) && (-500.0..=500.0).contains(&y) {
            let f = ((x / 500.0 + 1.0) * PI).sin();
            let g = 1.0 - (y / 500.0) * (y / 500.0);
            5.0 * f * g
        } else {
            0.0
        }
    }
}

impl Default for ArtificialTsunami2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for ArtificialTsunami2d {
    fn get_height(&self, _x: Real, _y: Real) -> Real {
        100.0
    }

    fn get_momentum_x(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_momentum_y(&self, _x: Real, _y: Real) -> Real {
        0.0
    }

    fn get_bathymetry(&self, x: Real, y: Real) -> Real {
        -100.0 + Self::displacement(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Real, expected: Real, tolerance: Real) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_artificial_tsunami_2d() {
        let setup = ArtificialTsunami2d::new();

        assert_eq!(setup.get_height(0.0, 0.0), 100.0);
        assert_eq!(setup.get_height(499.0, -499.0), 100.0);
        assert_eq!(setup.get_momentum_x(0.0, 0.0), 0.0);
        assert_eq!(setup.get_momentum_y(0.0, 0.0), 0.0);

        // Displacement vanishes at the center line and outside the square.
        assert_close(setup.get_bathymetry(0.0, 0.0), -100.0, 0.001);
        assert_close(setup.get_bathymetry(-500.0, 100.0), -100.0, 0.001);
        assert_eq!(setup.get_bathymetry(600.0, 0.0), -100.0);
        assert_eq!(setup.get_bathymetry(0.0, -501.0), -100.0);

        // d(300, 200) = 5 * sin(1.6 pi) * 0.84.
        assert_close(setup.get_bathymetry(300.0, 200.0), -103.994437, 0.001);
        // Maximum uplift sits at x = -250 on the y center line.
        assert_close(setup.get_bathymetry(-250.0, 0.0), -95.0, 0.001);
    }
}
