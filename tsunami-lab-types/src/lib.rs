//! Shared types for tsunami-lab
//!
//! This crate provides the common vocabulary used across the tsunami-lab
//! workspace: the floating point and index types of the solver, the
//! physical constants, and the boundary conditions of a computational
//! domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Floating point type of all physical quantities.
pub type Real = f64;

/// Index type for cell counts and grid addressing.
pub type CellIdx = usize;

/// Gravity constant used by the Riemann solver and flow diagnostics.
pub const GRAVITY: Real = 9.80665;

/// Water heights at or below this value are treated as dry: the cell
/// receives no net updates and is clamped to zero.
pub const DRY_TOLERANCE: Real = 0.001;

/// Threshold below which a neighboring cell counts as dry when edge
/// states are reconstructed for wall reflection.
pub const REFLECTION_TOLERANCE: Real = 0.00001;

/// Boundary condition of one domain edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Ghost cells copy the adjacent interior cell, waves leave freely.
    #[default]
    Outflow,
    /// Ghost cells reflect incoming waves back into the domain.
    Wall,
}

/// Error for boundary names that are neither `outflow` nor `wall`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown boundary condition: {0}")]
pub struct ParseBoundaryError(String);

impl FromStr for Boundary {
    type Err = ParseBoundaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "outflow" => Ok(Boundary::Outflow),
            "wall" => Ok(Boundary::Wall),
            _ => Err(ParseBoundaryError(s.to_string())),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Outflow => f.write_str("outflow"),
            Boundary::Wall => f.write_str("wall"),
        }
    }
}

// Config files historically carried both spellings, so deserialization
// goes through the case-insensitive parser.
impl<'de> Deserialize<'de> for Boundary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_parses_case_insensitively() {
        assert_eq!("outflow".parse::<Boundary>().unwrap(), Boundary::Outflow);
        assert_eq!("OUTFLOW".parse::<Boundary>().unwrap(), Boundary::Outflow);
        assert_eq!("wall".parse::<Boundary>().unwrap(), Boundary::Wall);
        assert_eq!("WALL".parse::<Boundary>().unwrap(), Boundary::Wall);
        assert!("open".parse::<Boundary>().is_err());
    }

    #[test]
    fn test_boundary_display_matches_config_spelling() {
        assert_eq!(Boundary::Outflow.to_string(), "outflow");
        assert_eq!(Boundary::Wall.to_string(), "wall");
    }
}
