//! F-wave solver for the one-dimensional shallow water equations.
//!
//! The solver decomposes the jump in fluxes across an edge into two waves
//! scaled by Roe-averaged wave speeds. Bathymetry enters as a source term
//! on the momentum component of the flux jump, which keeps a lake at rest
//! exactly at rest.

use tsunami_lab_types::{Real, GRAVITY};

/// Roe-averaged wave speeds of the left and right state.
///
/// Inputs are the water heights and particle velocities on both sides of
/// the edge. Returns the speeds ordered from left-going to right-going.
pub fn eigenvalues(h_l: Real, h_r: Real, u_l: Real, u_r: Real) -> (Real, Real) {
    let h_sqrt_l = h_l.sqrt();
    let h_sqrt_r = h_r.sqrt();

    let h_roe = 0.5 * (h_l + h_r);
    let u_roe = (h_sqrt_l * u_l + h_sqrt_r * u_r) / (h_sqrt_l + h_sqrt_r);

    let phase_speed = (GRAVITY * h_roe).sqrt();
    (u_roe - phase_speed, u_roe + phase_speed)
}

/// Wave strengths obtained by applying the inverse of the matrix of right
/// eigenvectors to the flux jump.
///
/// The momentum component of the flux jump carries the bathymetry source
/// term, so a constant water surface over varying bathymetry yields zero
/// strengths.
fn eigencoefficients(
    h_l: Real,
    h_r: Real,
    hu_l: Real,
    hu_r: Real,
    b_l: Real,
    b_r: Real,
    lambda_1: Real,
    lambda_2: Real,
) -> (Real, Real) {
    let flux_jump_0 = hu_r - hu_l;
    let mut flux_jump_1 = (hu_r * hu_r / h_r + 0.5 * GRAVITY * h_r * h_r)
        - (hu_l * hu_l / h_l + 0.5 * GRAVITY * h_l * h_l);
    flux_jump_1 += 0.5 * GRAVITY * (b_r - b_l) * (h_l + h_r);

    let det_inv = 1.0 / (lambda_2 - lambda_1);
    let alpha_1 = det_inv * (lambda_2 * flux_jump_0 - flux_jump_1);
    let alpha_2 = det_inv * (-lambda_1 * flux_jump_0 + flux_jump_1);
    (alpha_1, alpha_2)
}

/// Net updates of the left and right cell adjacent to an edge.
///
/// Each of the two waves contributes to the cell it travels into: waves
/// with negative speed update the left cell, all others the right cell.
/// The components of an update are `[height, momentum]`.
pub fn net_updates(
    h_l: Real,
    h_r: Real,
    hu_l: Real,
    hu_r: Real,
    b_l: Real,
    b_r: Real,
) -> ([Real; 2], [Real; 2]) {
    let u_l = hu_l / h_l;
    let u_r = hu_r / h_r;

    let (lambda_1, lambda_2) = eigenvalues(h_l, h_r, u_l, u_r);
    let (alpha_1, alpha_2) =
        eigencoefficients(h_l, h_r, hu_l, hu_r, b_l, b_r, lambda_1, lambda_2);

    let mut update_l = [0.0, 0.0];
    let mut update_r = [0.0, 0.0];

    for (alpha, lambda) in [(alpha_1, lambda_1), (alpha_2, lambda_2)] {
        let update = if lambda < 0.0 {
            &mut update_l
        } else {
            &mut update_r
        };
        update[0] += alpha;
        update[1] += alpha * lambda;
    }

    (update_l, update_r)
}
