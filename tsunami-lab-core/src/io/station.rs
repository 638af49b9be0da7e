//! Measurement stations.
//!
//! A station samples the state of one cell whenever the engine asks it
//! to, building up a time series that is written out as a CSV file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tsunami_lab_types::Real;

use crate::io::IoError;
use crate::patches::WavePropagation;

pub struct Station {
    name: String,
    ix: usize,
    iy: usize,
    records: Vec<StationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationRecord {
    pub time: Real,
    pub height: Real,
    pub momentum_x: Real,
    /// `None` for patches without a y momentum component.
    pub momentum_y: Option<Real>,
}

impl Station {
    /// A station at the given interior cell indices.
    pub fn new(name: impl Into<String>, ix: usize, iy: usize) -> Self {
        Self {
            name: name.into(),
            ix,
            iy,
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Samples the station cell at the given simulation time.
    pub fn capture(&mut self, time: Real, patch: &dyn WavePropagation) {
        let momentum_y = patch
            .momentum_y()
            .is_some()
            .then(|| patch.cell_momentum_y(self.ix, self.iy));
        self.records.push(StationRecord {
            time,
            height: patch.cell_height(self.ix, self.iy),
            momentum_x: patch.cell_momentum_x(self.ix, self.iy),
            momentum_y,
        });
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    /// Writes the recorded time series to `<directory>/<name>.csv` and
    /// returns the path. The directory is created if needed. The
    /// momentum_y column only appears for recordings that carry one.
    pub fn write(&self, directory: impl AsRef<Path>) -> Result<PathBuf, IoError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        let path = directory.join(format!("{}.csv", self.name));

        let has_momentum_y = self.records.iter().any(|record| record.momentum_y.is_some());

        let mut out = Vec::new();
        write!(out, "time,height,momentum_x")?;
        if has_momentum_y {
            write!(out, ",momentum_y")?;
        }
        writeln!(out)?;
        for record in &self.records {
            write!(out, "{},{},{}", record.time, record.height, record.momentum_x)?;
            if has_momentum_y {
                write!(out, ",{}", record.momentum_y.unwrap_or(0.0))?;
            }
            writeln!(out)?;
        }
        fs::write(&path, out)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use tsunami_lab_types::Boundary;

    use super::*;
    use crate::patches::{WavePropagation1d, WavePropagation2d};

    #[test]
    fn test_capture_1d() {
        let mut patch = WavePropagation1d::new(10, Boundary::Outflow, Boundary::Outflow);
        for ix in 0..10 {
            patch.set_height(ix, 0, ix as Real);
            patch.set_momentum_x(ix, 0, 2.0 * ix as Real);
        }

        let mut station = Station::new("buoy", 5, 0);
        station.capture(0.0, &patch);

        patch.set_height(5, 0, 42.0);
        station.capture(1.5, &patch);

        assert_eq!(
            station.records(),
            [
                StationRecord {
                    time: 0.0,
                    height: 5.0,
                    momentum_x: 10.0,
                    momentum_y: None,
                },
                StationRecord {
                    time: 1.5,
                    height: 42.0,
                    momentum_x: 10.0,
                    momentum_y: None,
                },
            ]
        );
    }

    #[test]
    fn test_capture_2d() {
        let mut patch = WavePropagation2d::new(
            8,
            8,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        patch.set_height(3, 4, 7.0);
        patch.set_momentum_x(3, 4, -1.0);
        patch.set_momentum_y(3, 4, 2.5);

        let mut station = Station::new("buoy", 3, 4);
        station.capture(0.25, &patch);

        assert_eq!(
            station.records(),
            [StationRecord {
                time: 0.25,
                height: 7.0,
                momentum_x: -1.0,
                momentum_y: Some(2.5),
            }]
        );
    }

    #[test]
    fn test_write_1d_omits_momentum_y() {
        let mut patch = WavePropagation1d::new(4, Boundary::Outflow, Boundary::Outflow);
        patch.set_height(2, 0, 3.0);
        patch.set_momentum_x(2, 0, 0.5);

        let mut station = Station::new("left_buoy", 2, 0);
        station.capture(0.0, &patch);
        station.capture(1.0, &patch);

        let dir = tempfile::tempdir().unwrap();
        let path = station.write(dir.path().join("stations")).unwrap();
        assert!(path.ends_with("left_buoy.csv"));

        let contents = fs::read_to_string(path).unwrap();
        let expected = "\
time,height,momentum_x
0,3,0.5
1,3,0.5
";
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_write_2d() {
        let mut patch = WavePropagation2d::new(
            4,
            4,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        patch.set_height(1, 1, 5.0);
        patch.set_momentum_y(1, 1, -0.25);

        let mut station = Station::new("mid", 1, 1);
        station.capture(2.0, &patch);

        let dir = tempfile::tempdir().unwrap();
        let path = station.write(dir.path()).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        let expected = "\
time,height,momentum_x,momentum_y
2,5,0,-0.25
";
        assert_eq!(contents, expected);
    }
}
