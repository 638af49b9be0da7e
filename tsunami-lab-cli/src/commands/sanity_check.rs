//! Middle-states verification command.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use tsunami_lab_core::middle_states;

const REQUIRED_PASS_RATE: f64 = 0.99;

pub fn run_sanity_check(file: &Path) -> Result<()> {
    let report = middle_states::verify_file(file)
        .with_context(|| format!("failed to verify {}", file.display()))?;
    let rate = report.pass_rate();
    info!(
        passed = report.passed,
        total = report.total,
        rate_percent = rate * 100.0,
        "middle states verified"
    );
    if rate < REQUIRED_PASS_RATE {
        bail!(
            "middle states pass rate {:.2}% is below the required 99%",
            rate * 100.0
        );
    }
    println!(
        "middle states check passed: {}/{} within tolerance",
        report.passed, report.total
    );
    Ok(())
}
