//! Standalone simulation runs.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tsunami_lab_core::Simulator;

const BANNER: &str = "\
####################################
### Tsunami Lab                  ###
###                              ###
### https://scalable.uni-jena.de ###
###                              ###
### by Luca-Philipp Grumbach     ###
### and Richard Hofmann          ###
###                              ###
####################################";

/// Loads the config, prepares the engine, and runs the time loop to
/// completion.
pub fn run_simulation(config: &Path) -> Result<()> {
    println!("{BANNER}");

    let simulator = Simulator::new();
    simulator
        .load_config_file(config)
        .with_context(|| format!("failed to load config {}", config.display()))?;
    simulator.prepare().context("preparation failed")?;
    simulator.run().context("simulation failed")?;

    let metrics = simulator.metrics();
    info!(
        time_steps = simulator.current_time_step(),
        preparing_seconds = metrics.preparing_time,
        calculation_seconds = metrics.calculation_time,
        seconds_per_time_step = metrics.time_per_time_step,
        "simulation finished"
    );
    Ok(())
}
