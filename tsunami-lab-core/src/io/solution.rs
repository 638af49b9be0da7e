//! Solution files.
//!
//! A solution file is newline-delimited JSON: a header line describing
//! the output grid followed by one frame line per written time step.
//! Output can be coarsened by averaging blocks of `k` x `k` cells, which
//! keeps large simulations streamable to clients.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tsunami_lab_types::Real;

use crate::io::IoError;
use crate::patches::WavePropagation;

pub struct SolutionWriter {
    out: BufWriter<File>,
    nx: usize,
    ny: usize,
    k: usize,
}

#[derive(Serialize, Deserialize)]
struct SolutionHeader {
    nx: usize,
    ny: usize,
    dx: Real,
    dy: Real,
    offset_x: Real,
    offset_y: Real,
    bathymetry: Vec<Real>,
}

#[derive(Serialize, Deserialize)]
struct SolutionFrame {
    time: Real,
    height: Vec<Real>,
    momentum_x: Vec<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    momentum_y: Option<Vec<Real>>,
}

impl SolutionWriter {
    /// Creates a fresh solution file and writes its header line.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        path: impl AsRef<Path>,
        nx: usize,
        ny: usize,
        dx: Real,
        dy: Real,
        offset_x: Real,
        offset_y: Real,
        k: usize,
        patch: &dyn WavePropagation,
    ) -> Result<Self, IoError> {
        let k = k.max(1);
        let file = File::create(path)?;
        let mut writer = Self {
            out: BufWriter::new(file),
            nx,
            ny,
            k,
        };

        let header = SolutionHeader {
            nx: nx / k,
            ny: ny / k,
            dx: dx * k as Real,
            dy: dy * k as Real,
            offset_x,
            offset_y,
            bathymetry: writer.coarsen(patch.bathymetry(), patch.stride()),
        };
        serde_json::to_writer(&mut writer.out, &header)?;
        writer.out.write_all(b"\n")?;
        writer.out.flush()?;
        Ok(writer)
    }

    /// Reopens an existing solution file for appending more frames. The
    /// header is expected to be in place already.
    pub fn resume(path: impl AsRef<Path>, nx: usize, ny: usize, k: usize) -> Result<Self, IoError> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            nx,
            ny,
            k: k.max(1),
        })
    }

    /// Appends one frame with the patch's current interior state.
    pub fn append(&mut self, time: Real, patch: &dyn WavePropagation) -> Result<(), IoError> {
        let stride = patch.stride();
        let frame = SolutionFrame {
            time,
            height: self.coarsen(patch.height(), stride),
            momentum_x: self.coarsen(patch.momentum_x(), stride),
            momentum_y: patch
                .momentum_y()
                .map(|momentum_y| self.coarsen(momentum_y, stride)),
        };
        serde_json::to_writer(&mut self.out, &frame)?;
        self.out.write_all(b"\n")?;
        // Flushed per frame so an aborted run still leaves usable output.
        self.out.flush()?;
        Ok(())
    }

    fn coarsen(&self, values: &[Real], stride: usize) -> Vec<Real> {
        let out_nx = self.nx / self.k;
        let out_ny = self.ny / self.k;
        let mut out = Vec::with_capacity(out_nx * out_ny);
        for block_y in 0..out_ny {
            for block_x in 0..out_nx {
                let mut sum = 0.0;
                for iy in block_y * self.k..(block_y + 1) * self.k {
                    for ix in block_x * self.k..(block_x + 1) * self.k {
                        sum += values[iy * stride + ix];
                    }
                }
                out.push(sum / (self.k * self.k) as Real);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tsunami_lab_types::Boundary;

    use super::*;
    use crate::patches::{WavePropagation1d, WavePropagation2d};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_coarsened_2d_output() {
        let mut patch = WavePropagation2d::new(
            4,
            4,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        for iy in 0..4 {
            for ix in 0..4 {
                patch.set_height(ix, iy, (iy * 4 + ix) as Real);
                patch.set_momentum_x(ix, iy, 1.0);
                patch.set_momentum_y(ix, iy, 2.0);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solution.jsonl");
        let mut writer =
            SolutionWriter::create(&path, 4, 4, 1.0, 1.0, -10.0, 0.0, 2, &patch).unwrap();
        writer.append(0.5, &patch).unwrap();
        drop(writer);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);

        let header = &lines[0];
        assert_eq!(header["nx"], json!(2));
        assert_eq!(header["ny"], json!(2));
        assert_eq!(header["dx"], json!(2.0));
        assert_eq!(header["dy"], json!(2.0));
        assert_eq!(header["offset_x"], json!(-10.0));
        assert_eq!(header["bathymetry"], json!([0.0, 0.0, 0.0, 0.0]));

        let frame = &lines[1];
        assert_eq!(frame["time"], json!(0.5));
        assert_eq!(frame["height"], json!([2.5, 4.5, 10.5, 12.5]));
        assert_eq!(frame["momentum_x"], json!([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(frame["momentum_y"], json!([2.0, 2.0, 2.0, 2.0]));
    }

    #[test]
    fn test_1d_output_has_no_momentum_y() {
        let mut patch = WavePropagation1d::new(4, Boundary::Outflow, Boundary::Outflow);
        for ix in 0..4 {
            patch.set_height(ix, 0, 1.0 + ix as Real);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solution.jsonl");
        let mut writer =
            SolutionWriter::create(&path, 4, 1, 2.5, 1.0, 0.0, 0.0, 1, &patch).unwrap();
        writer.append(0.0, &patch).unwrap();
        drop(writer);

        let lines = read_lines(&path);
        let frame = lines[1].as_object().unwrap();
        assert_eq!(frame["height"], json!([1.0, 2.0, 3.0, 4.0]));
        assert!(!frame.contains_key("momentum_y"));
    }

    #[test]
    fn test_resume_appends_frames() {
        let patch = WavePropagation1d::new(2, Boundary::Outflow, Boundary::Outflow);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solution.jsonl");

        let mut writer =
            SolutionWriter::create(&path, 2, 1, 1.0, 1.0, 0.0, 0.0, 1, &patch).unwrap();
        writer.append(0.0, &patch).unwrap();
        drop(writer);

        let mut writer = SolutionWriter::resume(&path, 2, 1, 1).unwrap();
        writer.append(1.0, &patch).unwrap();
        drop(writer);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["time"], json!(1.0));

        assert!(SolutionWriter::resume(dir.path().join("missing.jsonl"), 2, 1, 1).is_err());
    }
}
