//! Bathymetry input files.
//!
//! The format is CSV-like: comment lines start with `#`, a `DIM,<nx>,<ny>`
//! line declares the grid dimensions, and every other line is an
//! `<x>,<y>,<b>` sample at integer cell coordinates.

use std::fs;
use std::path::Path;

use tsunami_lab_types::Real;

use crate::io::{csv, IoError};

/// Bathymetry samples on a regular grid, zero outside the declared range.
pub struct BathymetryData {
    size_x: usize,
    size_y: usize,
    values: Vec<Real>,
}

impl BathymetryData {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let contents = fs::read_to_string(path)?;
        Self::from_csv(&contents)
    }

    fn from_csv(contents: &str) -> Result<Self, IoError> {
        let mut data: Option<BathymetryData> = None;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields = csv::split_line(line, ',');
            if fields.first() == Some(&"DIM") {
                let (size_x, size_y) = parse_dimensions(&fields)?;
                data = Some(BathymetryData {
                    size_x,
                    size_y,
                    values: vec![0.0; size_x * size_y],
                });
                continue;
            }

            let data = data
                .as_mut()
                .ok_or_else(|| IoError::Malformed("missing DIM header line".to_string()))?;
            let [x, y, value] = parse_sample(&fields)?;
            let (ix, iy) = (x as usize, y as usize);
            if x < 0.0 || ix >= data.size_x || y < 0.0 || iy >= data.size_y {
                return Err(IoError::Malformed(format!(
                    "bathymetry sample ({x}, {y}) outside the declared dimensions"
                )));
            }
            data.values[iy * data.size_x + ix] = value;
        }
        data.ok_or_else(|| IoError::Malformed("missing DIM header line".to_string()))
    }

    /// Samples the bathymetry at a point, zero outside the grid.
    pub fn sample(&self, x: Real, y: Real) -> Real {
        if x < 0.0 || y < 0.0 {
            return 0.0;
        }
        let (ix, iy) = (x as usize, y as usize);
        if ix >= self.size_x || iy >= self.size_y {
            return 0.0;
        }
        self.values[iy * self.size_x + ix]
    }
}

fn parse_dimensions(fields: &[&str]) -> Result<(usize, usize), IoError> {
    if fields.len() < 3 {
        return Err(IoError::Malformed(format!(
            "expected DIM,<nx>,<ny>, got: {}",
            fields.join(",")
        )));
    }
    let size_x = parse_real(fields[1])? as usize;
    let size_y = parse_real(fields[2])? as usize;
    Ok((size_x, size_y))
}

fn parse_sample(fields: &[&str]) -> Result<[Real; 3], IoError> {
    if fields.len() < 3 {
        return Err(IoError::Malformed(format!(
            "expected <x>,<y>,<b>, got: {}",
            fields.join(",")
        )));
    }
    Ok([
        parse_real(fields[0])?,
        parse_real(fields[1])?,
        parse_real(fields[2])?,
    ])
}

fn parse_real(field: &str) -> Result<Real, IoError> {
    field
        .parse::<Real>()
        .map_err(|_| IoError::Malformed(format!("invalid number: {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
# bathymetry for the test basin
DIM,3,2
0,0,-10
1,0,-20
2,0,-30
0,1,-40
2,1,-60
";

    #[test]
    fn test_sampling() {
        let data = BathymetryData::from_csv(INPUT).unwrap();

        assert_eq!(data.sample(0.0, 0.0), -10.0);
        assert_eq!(data.sample(2.0, 0.0), -30.0);
        assert_eq!(data.sample(0.0, 1.0), -40.0);
        // Samples not present in the file stay zero.
        assert_eq!(data.sample(1.0, 1.0), 0.0);
        // Fractional coordinates hit the containing cell.
        assert_eq!(data.sample(2.9, 0.5), -30.0);
    }

    #[test]
    fn test_out_of_range_is_zero() {
        let data = BathymetryData::from_csv(INPUT).unwrap();

        assert_eq!(data.sample(9.0, 9.0), 0.0);
        assert_eq!(data.sample(-1.0, 0.0), 0.0);
        assert_eq!(data.sample(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(BathymetryData::from_csv("0,0,-10").is_err());
        assert!(BathymetryData::from_csv("DIM,2\n").is_err());
        assert!(BathymetryData::from_csv("DIM,2,2\n5,5,-10").is_err());
        assert!(BathymetryData::from_csv("DIM,2,2\n0,0,abc").is_err());
    }
}
