//! Middle-states verification.
//!
//! Reference data is CSV with `h_l,h_r,hu_l,hu_r,h_star` rows, each one
//! a Riemann problem together with the water height that forms between
//! the two outgoing waves. The harness simulates every problem on a
//! small patch and checks the computed middle height against the
//! reference.

use std::fs;
use std::path::Path;

use tsunami_lab_types::{Boundary, Real, DRY_TOLERANCE};

use crate::io::{csv, IoError};
use crate::patches::{WavePropagation, WavePropagation1d};
use crate::setups::{GeneralDiscontinuity1d, Setup};

/// Required agreement between the simulated and the reference height.
pub const ACCURACY: Real = 0.00489;

/// At most this many rows are simulated per verification run.
pub const MAX_PROBLEMS: usize = 500;

const CELLS: usize = 10;
const DOMAIN_SIZE: Real = 10.0;
const END_TIME: Real = 1.25;

#[derive(Debug, Clone, Copy)]
struct RiemannProblem {
    h_l: Real,
    h_r: Real,
    hu_l: Real,
    hu_r: Real,
    h_star: Real,
}

#[derive(Debug, Clone, Copy)]
pub struct MiddleStatesReport {
    pub total: usize,
    pub passed: usize,
}

impl MiddleStatesReport {
    pub fn pass_rate(&self) -> Real {
        if self.total == 0 {
            return 1.0;
        }
        self.passed as Real / self.total as Real
    }
}

pub fn verify_file(path: impl AsRef<Path>) -> Result<MiddleStatesReport, IoError> {
    let contents = fs::read_to_string(path)?;
    verify_csv(&contents)
}

pub fn verify_csv(contents: &str) -> Result<MiddleStatesReport, IoError> {
    let mut report = MiddleStatesReport {
        total: 0,
        passed: 0,
    };
    for line in contents.lines() {
        if report.total == MAX_PROBLEMS {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let problem = parse_problem(line)?;
        report.total += 1;

        let simulated = simulate(&problem);
        if (simulated - problem.h_star).abs() <= ACCURACY {
            report.passed += 1;
        } else {
            tracing::debug!(
                h_l = problem.h_l,
                h_r = problem.h_r,
                hu_l = problem.hu_l,
                hu_r = problem.hu_r,
                expected = problem.h_star,
                simulated,
                "Middle state missed the reference height"
            );
        }
    }
    tracing::info!(
        total = report.total,
        passed = report.passed,
        "Verified middle states"
    );
    Ok(report)
}

fn parse_problem(line: &str) -> Result<RiemannProblem, IoError> {
    let fields = csv::split_line(line, ',');
    if fields.len() < 5 {
        return Err(IoError::Malformed(format!(
            "expected h_l,h_r,hu_l,hu_r,h_star, got: {line}"
        )));
    }
    let mut values = [0.0; 5];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field
            .parse::<Real>()
            .map_err(|_| IoError::Malformed(format!("invalid number: {field}")))?;
    }
    let [h_l, h_r, hu_l, hu_r, h_star] = values;
    Ok(RiemannProblem {
        h_l,
        h_r,
        hu_l,
        hu_r,
        h_star,
    })
}

/// Runs one Riemann problem to `END_TIME` and returns the height right
/// of the initial discontinuity.
fn simulate(problem: &RiemannProblem) -> Real {
    let setup = GeneralDiscontinuity1d::new(
        problem.h_l,
        problem.h_r,
        problem.hu_l,
        problem.hu_r,
        DOMAIN_SIZE / 2.0,
    );
    let dx = DOMAIN_SIZE / CELLS as Real;

    let mut patch = WavePropagation1d::new(CELLS, Boundary::Outflow, Boundary::Outflow);
    let mut h_max: Real = 0.0;
    for ix in 0..CELLS {
        let x = (ix as Real + 0.5) * dx;
        let height = setup.get_height(x, 0.0);
        h_max = h_max.max(height);
        patch.set_height(ix, 0, height);
        patch.set_momentum_x(ix, 0, setup.get_momentum_x(x, 0.0));
    }
    if h_max <= DRY_TOLERANCE {
        return patch.cell_height(CELLS / 2, 0);
    }

    let dt = 0.5 * dx / (9.81 * h_max).sqrt();
    let scaling = dt / dx;
    let mut sim_time = 0.0;
    while sim_time < END_TIME {
        patch.set_ghost_outflow();
        patch.time_step(scaling, 0.0);
        sim_time += dt;
    }
    patch.cell_height(CELLS / 2, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_problems_pass() {
        let contents = "\
# h_l, h_r, hu_l, hu_r, h_star
10,10,0,0,10
8431.8,8431.8,0,0,8431.8
5,5,2.5,2.5,5
725,725,-300,-300,725
";
        let report = verify_csv(contents).unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 4);
        assert_eq!(report.pass_rate(), 1.0);
    }

    #[test]
    fn test_wrong_reference_fails() {
        let contents = "\
10,10,0,0,10
10,10,0,0,12.5
";
        let report = verify_csv(contents).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.pass_rate(), 0.5);
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        assert!(verify_csv("10,10,0,0").is_err());
        assert!(verify_csv("10,10,zero,0,10").is_err());
    }

    #[test]
    fn test_empty_data() {
        let report = verify_csv("# nothing here\n").unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(report.pass_rate(), 1.0);
    }
}
