//! Initial conditions of the solver.

pub mod artificial_tsunami_2d;
pub mod circular_dam_break_2d;
pub mod dam_break_1d;
pub mod general_discontinuity_1d;
pub mod rare_rare_1d;
pub mod shock_shock_1d;
pub mod subcritical_1d;
pub mod supercritical_1d;
pub mod tsunami_event_1d;
pub mod tsunami_event_2d;

pub use artificial_tsunami_2d::ArtificialTsunami2d;
pub use circular_dam_break_2d::CircularDamBreak2d;
pub use dam_break_1d::DamBreak1d;
pub use general_discontinuity_1d::GeneralDiscontinuity1d;
pub use rare_rare_1d::RareRare1d;
pub use shock_shock_1d::ShockShock1d;
pub use subcritical_1d::Subcritical1d;
pub use supercritical_1d::Supercritical1d;
pub use tsunami_event_1d::TsunamiEvent1d;
pub use tsunami_event_2d::TsunamiEvent2d;

use thiserror::Error;
use tsunami_lab_types::Real;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to read input file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed input data: {0}")]
    Malformed(String),
}

/// One initial condition, queried in metre coordinates.
///
/// Implementations are pure functions of the position; the engine samples
/// them once per cell when a simulation is prepared.
pub trait Setup: Send + Sync {
    fn get_height(&self, x: Real, y: Real) -> Real;

    fn get_momentum_x(&self, x: Real, y: Real) -> Real;

    fn get_momentum_y(&self, x: Real, y: Real) -> Real;

    fn get_bathymetry(&self, _x: Real, _y: Real) -> Real {
        0.0
    }
}
