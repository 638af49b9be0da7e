//! Froude number diagnostics.

use tsunami_lab_types::{Real, GRAVITY};

use crate::setups::Setup;

/// Froude number of a wet water column.
pub fn froude_number(height: Real, momentum: Real) -> Real {
    let particle_velocity = momentum / height;
    particle_velocity / (GRAVITY * height).sqrt()
}

/// Scans a 1d setup along the x axis and returns the maximum Froude
/// number together with its position, or `None` if every sample is dry.
pub fn max_froude(setup: &dyn Setup, size_x: Real, samples: usize) -> Option<(Real, Real)> {
    let dx = size_x / samples as Real;
    let mut maximum: Option<(Real, Real)> = None;
    for sample in 0..samples {
        let x = (sample as Real + 0.5) * dx;
        let height = setup.get_height(x, 0.0);
        if height <= 0.0 {
            continue;
        }
        let froude = froude_number(height, setup.get_momentum_x(x, 0.0));
        if maximum.is_none_or(|(best, _)| froude > best) {
            maximum = Some((froude, x));
        }
    }
    maximum
}
