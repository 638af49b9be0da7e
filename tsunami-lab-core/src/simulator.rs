//! The simulation engine.
//!
//! A [`Simulator`] owns one simulation: it prepares the domain from a
//! config, advances it through the time loop, and writes solution
//! frames, station series and checkpoints along the way. All control
//! flags are atomics and the run state sits behind a mutex that is only
//! held per time step, so a remote control thread can query and steer a
//! running simulation.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use tsunami_lab_types::{CellIdx, Real};

use crate::config::{ConfigError, OutputMethod, SimulatorConfig};
use crate::io::checkpoint::{self, Checkpoint};
use crate::io::{csv, BathymetryData, IoError, SolutionWriter, Station};
use crate::patches::{WavePropagation, WavePropagation1d, WavePropagation2d};
use crate::setups::{
    ArtificialTsunami2d, CircularDamBreak2d, DamBreak1d, GeneralDiscontinuity1d, RareRare1d, Setup,
    SetupError, ShockShock1d, Subcritical1d, Supercritical1d, TsunamiEvent1d, TsunamiEvent2d,
};

#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Failed to access simulation files: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read or write simulation data: {0}")]
    Data(#[from] IoError),

    #[error("Failed to construct setup: {0}")]
    Setup(#[from] SetupError),

    #[error("Unknown setup: {0}")]
    UnknownSetup(String),

    #[error("Unknown solver: {0}")]
    UnknownSolver(String),

    #[error("Missing input files for setup {0}")]
    MissingSetupData(String),

    #[error("No simulation has been prepared")]
    NotPrepared,
}

/// Wall-clock timings of the current simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics {
    pub preparing_time: f64,
    pub calculation_time: f64,
    pub time_per_time_step: f64,
}

/// Cell counts, extents and offsets of the prepared domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub nx: CellIdx,
    pub ny: CellIdx,
    pub size_x: Real,
    pub size_y: Real,
    pub offset_x: Real,
    pub offset_y: Real,
}

pub struct Simulator {
    is_prepared: AtomicBool,
    is_preparing: AtomicBool,
    is_calculating: AtomicBool,
    is_resetting: AtomicBool,
    should_exit: AtomicBool,
    pause: AtomicBool,
    use_file_io: AtomicBool,
    state: Mutex<SimulationState>,
    metrics: Mutex<Metrics>,
}

struct SimulationState {
    config: SimulatorConfig,
    base_dir: PathBuf,
    setup_choice: String,
    setup: Option<Box<dyn Setup>>,
    patch: Option<Box<dyn WavePropagation>>,
    solution_writer: Option<SolutionWriter>,
    stations: Vec<Station>,
    nx: CellIdx,
    ny: CellIdx,
    nk: CellIdx,
    size_x: Real,
    size_y: Real,
    offset_x: Real,
    offset_y: Real,
    dx: Real,
    dy: Real,
    end_time: Real,
    writing_frequency: usize,
    checkpoint_frequency: Real,
    station_frequency: Real,
    output_method: OutputMethod,
    solution_path: PathBuf,
    checkpoint_path: PathBuf,
    sim_time: Real,
    time_step: usize,
    time_step_max: usize,
    dt: Real,
    scaling_x: Real,
    scaling_y: Real,
    h_max: Real,
    capture_count: usize,
    frames_written: usize,
}

impl SimulationState {
    fn new() -> Self {
        Self {
            config: SimulatorConfig::default(),
            base_dir: PathBuf::from("."),
            setup_choice: String::new(),
            setup: None,
            patch: None,
            solution_writer: None,
            stations: Vec::new(),
            nx: 1,
            ny: 1,
            nk: 1,
            size_x: 10.0,
            size_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            dx: 0.0,
            dy: 0.0,
            end_time: 20.0,
            writing_frequency: 80,
            checkpoint_frequency: -1.0,
            station_frequency: 1.0,
            output_method: OutputMethod::Jsonl,
            solution_path: PathBuf::new(),
            checkpoint_path: PathBuf::new(),
            sim_time: 0.0,
            time_step: 0,
            time_step_max: 0,
            dt: 0.0,
            scaling_x: 0.0,
            scaling_y: 0.0,
            h_max: 0.0,
            capture_count: 0,
            frames_written: 0,
        }
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            is_prepared: AtomicBool::new(false),
            is_preparing: AtomicBool::new(false),
            is_calculating: AtomicBool::new(false),
            is_resetting: AtomicBool::new(false),
            should_exit: AtomicBool::new(false),
            pause: AtomicBool::new(false),
            use_file_io: AtomicBool::new(true),
            state: Mutex::new(SimulationState::new()),
            metrics: Mutex::new(Metrics::default()),
        }
    }

    /// Directory that `solutions/`, `stations/`, `checkpoints/` and all
    /// relative file paths are resolved against.
    pub fn set_base_dir(&self, path: impl Into<PathBuf>) {
        self.state.lock().base_dir = path.into();
    }

    pub fn is_prepared(&self) -> bool {
        self.is_prepared.load(Ordering::SeqCst)
    }

    /// Marks the simulation as prepared or forces the next run to
    /// prepare again.
    pub fn set_prepared(&self, prepared: bool) {
        self.is_prepared.store(prepared, Ordering::SeqCst);
    }

    pub fn is_preparing(&self) -> bool {
        self.is_preparing.load(Ordering::SeqCst)
    }

    pub fn is_calculating(&self) -> bool {
        self.is_calculating.load(Ordering::SeqCst)
    }

    pub fn is_resetting(&self) -> bool {
        self.is_resetting.load(Ordering::SeqCst)
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::SeqCst)
    }

    /// Signals the preparation stages and the time loop to bail out at
    /// the next opportunity.
    pub fn set_should_exit(&self, exit: bool) {
        self.should_exit.store(exit, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.pause.load(Ordering::SeqCst)
    }

    /// Pauses or continues the time loop without tearing it down.
    pub fn set_paused(&self, paused: bool) {
        self.pause.store(paused, Ordering::SeqCst);
    }

    pub fn uses_file_io(&self) -> bool {
        self.use_file_io.load(Ordering::SeqCst)
    }

    /// Disabling file IO skips all solution, station and checkpoint
    /// output, which is the mode benchmark runs use.
    pub fn set_file_io(&self, use_file_io: bool) {
        self.use_file_io.store(use_file_io, Ordering::SeqCst);
    }

    pub fn load_config_file(&self, path: impl AsRef<Path>) -> Result<(), SimulatorError> {
        let mut state = self.state.lock();
        let path = resolve(&state.base_dir, path.as_ref());
        info!(path = %path.display(), "loading config file");
        state.config = SimulatorConfig::from_file(path)?;
        self.is_prepared.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn load_config_json(&self, json: serde_json::Value) -> Result<(), SimulatorError> {
        let mut state = self.state.lock();
        state.config = SimulatorConfig::from_value(json)?;
        self.is_prepared.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn set_cell_amount(&self, nx: CellIdx, ny: CellIdx) {
        let mut state = self.state.lock();
        state.config.nx = nx;
        state.config.ny = ny;
        self.is_prepared.store(false, Ordering::SeqCst);
    }

    pub fn set_offset(&self, offset_x: Real, offset_y: Real) {
        let mut state = self.state.lock();
        state.config.offset_x = offset_x;
        state.config.offset_y = offset_y;
        self.is_prepared.store(false, Ordering::SeqCst);
    }

    pub fn set_bathymetry_file_path(&self, path: impl Into<PathBuf>) {
        let mut state = self.state.lock();
        state.config.bathymetry = Some(path.into());
        self.is_prepared.store(false, Ordering::SeqCst);
    }

    pub fn set_displacement_file_path(&self, path: impl Into<PathBuf>) {
        let mut state = self.state.lock();
        state.config.displacement = Some(path.into());
        self.is_prepared.store(false, Ordering::SeqCst);
    }

    pub fn set_setup_choice(&self, setup: impl Into<String>) {
        let mut state = self.state.lock();
        state.config.setup = setup.into();
        self.is_prepared.store(false, Ordering::SeqCst);
    }

    pub fn current_time_step(&self) -> usize {
        self.state.lock().time_step
    }

    pub fn max_time_steps(&self) -> usize {
        self.state.lock().time_step_max
    }

    pub fn simulated_time(&self) -> Real {
        self.state.lock().sim_time
    }

    pub fn domain_info(&self) -> DomainInfo {
        let state = self.state.lock();
        DomainInfo {
            nx: state.nx,
            ny: state.ny,
            size_x: state.size_x,
            size_y: state.size_y,
            offset_x: state.offset_x,
            offset_y: state.offset_y,
        }
    }

    /// The interior water heights in row-major order, `None` before the
    /// first preparation.
    pub fn height_data(&self) -> Option<Vec<Real>> {
        let state = self.state.lock();
        let patch = state.patch.as_deref()?;
        Some(checkpoint::interior_values(
            patch.height(),
            patch.stride(),
            state.nx,
            state.ny,
        ))
    }

    pub fn metrics(&self) -> Metrics {
        *self.metrics.lock()
    }

    /// Remaining wall-clock seconds, extrapolated from the measured
    /// time per step.
    pub fn estimated_time_left(&self) -> f64 {
        let (time_step, time_step_max) = {
            let state = self.state.lock();
            (state.time_step, state.time_step_max)
        };
        time_step_max.saturating_sub(time_step) as f64 * self.metrics.lock().time_per_time_step
    }

    /// Builds the domain described by the loaded config: folders, setup,
    /// patch, initial values, bathymetry overlay, output files and
    /// stations. A found checkpoint takes precedence over the configured
    /// setup and the run resumes from it.
    pub fn prepare(&self) -> Result<(), SimulatorError> {
        self.is_preparing.store(true, Ordering::SeqCst);
        let started = Instant::now();
        let result = self.prepare_inner();
        self.metrics.lock().preparing_time = started.elapsed().as_secs_f64();
        self.is_preparing.store(false, Ordering::SeqCst);
        if result.is_ok() && !self.should_exit() {
            self.is_prepared.store(true, Ordering::SeqCst);
        }
        result
    }

    fn prepare_inner(&self) -> Result<(), SimulatorError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        info!("preparing simulation");

        if self.uses_file_io() {
            setup_folders(&state.base_dir)?;
        }
        if self.should_exit() {
            return Ok(());
        }

        state.solution_path = solution_path(state);
        state.checkpoint_path = checkpoint_path(state);
        state.setup_choice = state.config.setup_choice();
        if self.uses_file_io() {
            if state.checkpoint_path.exists() {
                info!(path = %state.checkpoint_path.display(), "found checkpoint file");
                state.setup_choice = "CHECKPOINT".to_string();
            } else if state.solution_path.exists() {
                info!("solution file exists without a checkpoint, deleting it");
                fs::remove_file(&state.solution_path)?;
            }
        }

        if state.config.solver != "fwave" {
            return Err(SimulatorError::UnknownSolver(state.config.solver.clone()));
        }
        state.nx = state.config.nx;
        state.ny = state.config.ny;
        state.nk = state.config.nk;
        state.size_x = state.config.simulation_size_x;
        state.size_y = state.config.simulation_size_y;
        state.offset_x = state.config.offset_x;
        state.offset_y = state.config.offset_y;
        state.end_time = state.config.end_time;
        state.writing_frequency = state.config.writing_frequency.max(1);
        state.checkpoint_frequency = state.config.checkpoint_frequency;
        state.station_frequency = state.config.station_frequency;
        state.output_method = state.config.output_method;
        state.sim_time = 0.0;
        state.time_step = 0;
        state.time_step_max = 0;
        state.frames_written = 0;
        state.capture_count = 0;
        state.h_max = 0.0;
        state.setup = None;
        state.patch = None;
        state.solution_writer = None;
        state.stations.clear();

        let mut restored = None;
        if state.setup_choice == "CHECKPOINT" {
            let loaded = Checkpoint::load(&state.checkpoint_path)?;
            state.nx = loaded.nx;
            state.ny = loaded.ny;
            state.size_x = loaded.size_x;
            state.size_y = loaded.size_y;
            state.offset_x = loaded.offset_x;
            state.offset_y = loaded.offset_y;
            state.sim_time = loaded.sim_time;
            state.time_step = loaded.time_step;
            state.frames_written = loaded.frames_written;
            info!(
                sim_time = state.sim_time,
                time_step = state.time_step,
                nx = state.nx,
                ny = state.ny,
                "resuming from checkpoint"
            );
            restored = Some(loaded);
        } else {
            state.setup = Some(construct_setup(
                &state.setup_choice,
                &state.config,
                &state.base_dir,
                &mut state.size_x,
                &mut state.size_y,
                &mut state.offset_x,
                &mut state.offset_y,
            )?);
            info!(
                setup = %state.setup_choice,
                nx = state.nx,
                ny = state.ny,
                "constructed setup"
            );
        }
        if self.should_exit() {
            return Ok(());
        }

        state.dx = state.size_x / state.nx as Real;
        state.dy = state.size_y / state.ny as Real;
        let mut patch: Box<dyn WavePropagation> = if state.ny == 1 {
            Box::new(WavePropagation1d::new(
                state.nx,
                state.config.boundary_l,
                state.config.boundary_r,
            ))
        } else {
            Box::new(WavePropagation2d::new(
                state.nx,
                state.ny,
                state.config.boundary_l,
                state.config.boundary_r,
                state.config.boundary_t,
                state.config.boundary_b,
            ))
        };

        if let Some(loaded) = &restored {
            loaded.apply(patch.as_mut());
            state.h_max = loaded.h_max;
        } else if let Some(setup) = state.setup.as_deref() {
            let mut h_max = Real::MIN;
            for cy in 0..state.ny {
                let y = cy as Real * state.dy + state.offset_y;
                for cx in 0..state.nx {
                    let x = cx as Real * state.dx + state.offset_x;
                    let height = setup.get_height(x, y);
                    h_max = h_max.max(height);
                    patch.set_height(cx, cy, height);
                    patch.set_momentum_x(cx, cy, setup.get_momentum_x(x, y));
                    patch.set_momentum_y(cx, cy, setup.get_momentum_y(x, y));
                    patch.set_bathymetry(cx, cy, setup.get_bathymetry(x, y));
                }
            }
            state.h_max = h_max;
        }
        if self.should_exit() {
            return Ok(());
        }

        // A checkpoint already carries the final bathymetry.
        if restored.is_none() {
            if let Some(path) = &state.config.bathymetry {
                if path.extension().is_some_and(|extension| extension == "csv") {
                    let path = resolve(&state.base_dir, path);
                    info!(path = %path.display(), "loading bathymetry overlay");
                    let data = BathymetryData::from_file(path)?;
                    for cy in 0..state.ny {
                        let y = cy as Real * state.dy;
                        for cx in 0..state.nx {
                            let x = cx as Real * state.dx;
                            patch.set_bathymetry(cx, cy, data.sample(x, y));
                        }
                    }
                    patch.adjust_water_height();
                }
            }
        }

        if self.uses_file_io() && state.output_method == OutputMethod::Jsonl {
            let writer = if restored.is_some() && state.solution_path.exists() {
                SolutionWriter::resume(&state.solution_path, state.nx, state.ny, state.nk)?
            } else {
                SolutionWriter::create(
                    &state.solution_path,
                    state.nx,
                    state.ny,
                    state.dx,
                    state.dy,
                    state.offset_x,
                    state.offset_y,
                    state.nk,
                    patch.as_ref(),
                )?
            };
            state.solution_writer = Some(writer);
        }
        state.patch = Some(patch);

        if self.uses_file_io() && !state.config.stations.is_empty() {
            info!(
                frequency = state.station_frequency,
                count = state.config.stations.len(),
                "setting up stations"
            );
            for station_config in &state.config.stations {
                let cx = ((station_config.loc_x - state.offset_x) / state.dx).floor();
                let cy = ((station_config.loc_y - state.offset_y) / state.dy).floor();
                if cx < 0.0 || cy < 0.0 || cx >= state.nx as Real || cy >= state.ny as Real {
                    warn!(station = %station_config.name, "station lies outside the domain, skipping");
                    continue;
                }
                debug!(
                    station = %station_config.name,
                    x = station_config.loc_x,
                    y = station_config.loc_y,
                    "added station"
                );
                state
                    .stations
                    .push(Station::new(&station_config.name, cx as usize, cy as usize));
            }
        }
        Ok(())
    }

    /// Runs the simulation to its end time, preparing first if needed.
    /// Returns immediately when another run is in progress.
    pub fn run(&self) -> Result<(), SimulatorError> {
        if self.is_calculating.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let result = self.run_inner();
        self.is_calculating.store(false, Ordering::SeqCst);
        result
    }

    fn run_inner(&self) -> Result<(), SimulatorError> {
        if !self.is_prepared() {
            self.prepare()?;
        }
        if self.should_exit() {
            return Ok(());
        }

        info!("entering time loop");
        self.run_calculation()?;
        info!("finished time loop");

        if self.uses_file_io() {
            let state = self.state.lock();
            let station_dir = state.base_dir.join("stations");
            for station in &state.stations {
                station.write(&station_dir)?;
            }
        }
        // A finished run leaves no checkpoint; a killed one keeps it
        // so the next start resumes.
        if !self.should_exit() {
            let state = self.state.lock();
            if state.checkpoint_path.exists() {
                fs::remove_file(&state.checkpoint_path)?;
            }
        }
        info!("finished, exiting");
        Ok(())
    }

    fn run_calculation(&self) -> Result<(), SimulatorError> {
        self.derive_time_step();
        let started = Instant::now();
        let start_step = self.state.lock().time_step;
        let mut last_checkpoint = Instant::now();

        loop {
            if self.should_exit() {
                break;
            }
            if self.is_paused() {
                thread::sleep(Duration::from_millis(50));
                continue;
            }

            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.sim_time >= state.end_time {
                break;
            }

            if self.uses_file_io() {
                if state.time_step % state.writing_frequency == 0 {
                    debug!(
                        sim_time = state.sim_time,
                        time_step = state.time_step,
                        "writing frame"
                    );
                    write_frame(state)?;
                }
                if !state.stations.is_empty()
                    && state.sim_time >= state.station_frequency * state.capture_count as Real
                {
                    if let Some(patch) = state.patch.as_deref() {
                        for station in &mut state.stations {
                            station.capture(state.sim_time, patch);
                        }
                    }
                    state.capture_count += 1;
                }
                if state.checkpoint_frequency > 0.0
                    && last_checkpoint.elapsed().as_secs_f64() >= state.checkpoint_frequency
                {
                    write_checkpoint_state(state)?;
                    last_checkpoint = Instant::now();
                }
            }
            if self.should_exit() {
                break;
            }

            let scaling_x = state.scaling_x;
            let scaling_y = state.scaling_y;
            let dt = state.dt;
            if let Some(patch) = state.patch.as_deref_mut() {
                patch.set_ghost_outflow();
                patch.time_step(scaling_x, scaling_y);
            }
            state.time_step += 1;
            state.sim_time += dt;
            let steps = state.time_step - start_step;
            drop(guard);

            let elapsed = started.elapsed().as_secs_f64();
            let mut metrics = self.metrics.lock();
            metrics.calculation_time = elapsed;
            if steps > 0 {
                metrics.time_per_time_step = elapsed / steps as f64;
            }
        }
        Ok(())
    }

    /// Derives the constant time step from the maximum initial water
    /// height; height changes during the simulation are ignored.
    fn derive_time_step(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let speed_max = (9.81 * state.h_max).sqrt();
        state.dt = if state.ny == 1 {
            0.5 * state.dx / speed_max
        } else {
            0.45 * state.dx.min(state.dy) / speed_max
        };
        state.time_step_max = ((state.end_time / state.dt).ceil() as usize).saturating_add(1);
        state.scaling_x = state.dt / state.dx;
        state.scaling_y = state.dt / state.dy;
        info!(
            dt = state.dt,
            steps = state.time_step_max,
            "derived time step"
        );

        if self.uses_file_io() {
            info!(every = state.writing_frequency, "frame writing frequency");
            if state.checkpoint_frequency > 0.0 {
                info!(seconds = state.checkpoint_frequency, "checkpoint frequency");
            } else {
                warn!("checkpoints are disabled for this run");
            }
        }
        if state.sim_time > 0.0 {
            state.capture_count = (state.sim_time / state.station_frequency).floor() as usize;
        }
    }

    /// Snapshots the current state into the checkpoint file.
    pub fn write_checkpoint(&self) -> Result<(), SimulatorError> {
        let state = self.state.lock();
        write_checkpoint_state(&state)
    }

    /// Discards the run state including the checkpoint file and
    /// prepares again from the retained config.
    pub fn reset(&self) -> Result<(), SimulatorError> {
        info!("resetting simulator");
        self.is_resetting.store(true, Ordering::SeqCst);
        self.is_prepared.store(false, Ordering::SeqCst);
        let result = self.clear_run_state().and_then(|_| self.prepare());
        self.is_resetting.store(false, Ordering::SeqCst);
        result
    }

    fn clear_run_state(&self) -> Result<(), SimulatorError> {
        let mut state = self.state.lock();
        state.setup = None;
        state.patch = None;
        state.solution_writer = None;
        state.stations.clear();
        if self.uses_file_io() {
            let path = checkpoint_path(&state);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn delete_checkpoints(&self) -> Result<(), SimulatorError> {
        let state = self.state.lock();
        let path = checkpoint_path(&state);
        if path.exists() {
            fs::remove_file(&path)?;
            info!(path = %path.display(), "deleted checkpoint");
        }
        Ok(())
    }

    /// Drops the loaded stations and their recorded series.
    pub fn delete_stations(&self) {
        let mut state = self.state.lock();
        state.stations.clear();
        info!("deleted stations");
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn setup_folders(base_dir: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(base_dir.join("solutions"))?;
    fs::create_dir_all(base_dir.join("stations"))?;
    fs::create_dir_all(base_dir.join("checkpoints"))?;
    Ok(())
}

fn solution_path(state: &SimulationState) -> PathBuf {
    state
        .base_dir
        .join("solutions")
        .join(format!("{}.jsonl", state.config.output_file_name))
}

fn checkpoint_path(state: &SimulationState) -> PathBuf {
    state
        .base_dir
        .join("checkpoints")
        .join(format!("{}.json", state.config.output_file_name))
}

fn construct_setup(
    choice: &str,
    config: &SimulatorConfig,
    base_dir: &Path,
    size_x: &mut Real,
    size_y: &mut Real,
    offset_x: &mut Real,
    offset_y: &mut Real,
) -> Result<Box<dyn Setup>, SimulatorError> {
    let setup: Box<dyn Setup> = match choice {
        "GENERALDISCONTINUITY1D" => Box::new(GeneralDiscontinuity1d::new(
            10.0,
            10.0,
            10.0,
            -10.0,
            *size_x / 2.0,
        )),
        "DAMBREAK1D" => Box::new(DamBreak1d::new(10.0, 5.0, *size_x / 2.0)),
        "CIRCULARDAMBREAK2D" => Box::new(CircularDamBreak2d::new()),
        "RARERARE1D" => Box::new(RareRare1d::new(10.0, 5.0, *size_x / 2.0)),
        "SHOCKSHOCK1D" => Box::new(ShockShock1d::new(10.0, 5.0, *size_x / 2.0)),
        "SUBCRITICAL1D" => {
            *size_x = 10.0;
            Box::new(Subcritical1d::new(0.0001, 5.0))
        }
        "SUPERCRITICAL1D" => {
            *size_x = 10.0;
            Box::new(Supercritical1d::new(0.0001, 5.0))
        }
        "TSUNAMIEVENT1D" => {
            let Some(path) = &config.bathymetry else {
                return Err(SimulatorError::MissingSetupData(choice.to_string()));
            };
            Box::new(TsunamiEvent1d::from_file(resolve(base_dir, path))?)
        }
        "TSUNAMIEVENT2D" => Box::new(TsunamiEvent2d::new(
            base_dir.join("resources/artificialtsunami_bathymetry_1000.json"),
            base_dir.join("resources/artificialtsunami_displ_1000.json"),
        )),
        "ARTIFICIAL2D" => {
            *size_x = 10_000.0;
            *size_y = 10_000.0;
            *offset_x = -5_000.0;
            *offset_y = -5_000.0;
            Box::new(ArtificialTsunami2d::new())
        }
        "CHILE" => {
            *size_x = 3_500_000.0;
            *size_y = 2_950_000.0;
            *offset_x = -2_999_875.0;
            *offset_y = -1_449_875.0;
            Box::new(TsunamiEvent2d::new(
                base_dir.join("resources/chile/chile_gebco20_usgs_250m_bath_fixed.json"),
                base_dir.join("resources/chile/chile_gebco20_usgs_250m_displ_fixed.json"),
            ))
        }
        "TOHOKU" => {
            *size_x = 2_700_000.0;
            *size_y = 1_500_000.0;
            *offset_x = -199_875.0;
            *offset_y = -749_875.0;
            Box::new(TsunamiEvent2d::new(
                base_dir.join("resources/tohoku/tohoku_gebco08_ucsb3_250m_bath.json"),
                base_dir.join("resources/tohoku/tohoku_gebco08_ucsb3_250m_displ.json"),
            ))
        }
        "CUSTOM" => {
            let (Some(bathymetry), Some(displacement)) =
                (config.bathymetry.as_ref(), config.displacement.as_ref())
            else {
                return Err(SimulatorError::MissingSetupData(choice.to_string()));
            };
            Box::new(TsunamiEvent2d::new(
                resolve(base_dir, bathymetry),
                resolve(base_dir, displacement),
            ))
        }
        _ => return Err(SimulatorError::UnknownSetup(choice.to_string())),
    };
    Ok(setup)
}

fn write_frame(state: &mut SimulationState) -> Result<(), SimulatorError> {
    let Some(patch) = state.patch.as_deref() else {
        return Ok(());
    };
    match state.output_method {
        OutputMethod::Jsonl => {
            if let Some(writer) = state.solution_writer.as_mut() {
                writer.append(state.sim_time, patch)?;
            }
        }
        OutputMethod::Csv => {
            let path = state.base_dir.join("solutions").join(format!(
                "{}_{}.csv",
                state.config.output_file_name, state.frames_written
            ));
            let mut out = BufWriter::new(File::create(path)?);
            csv::write(
                &mut out,
                state.dx,
                state.nx,
                state.ny,
                patch.stride(),
                Some(patch.height()),
                Some(patch.momentum_x()),
                patch.momentum_y(),
                Some(patch.bathymetry()),
            )?;
        }
    }
    state.frames_written += 1;
    Ok(())
}

fn write_checkpoint_state(state: &SimulationState) -> Result<(), SimulatorError> {
    let Some(patch) = state.patch.as_deref() else {
        return Err(SimulatorError::NotPrepared);
    };
    let stride = patch.stride();
    let snapshot = Checkpoint {
        nx: state.nx,
        ny: state.ny,
        size_x: state.size_x,
        size_y: state.size_y,
        offset_x: state.offset_x,
        offset_y: state.offset_y,
        sim_time: state.sim_time,
        time_step: state.time_step,
        frames_written: state.frames_written,
        h_max: state.h_max,
        height: checkpoint::interior_values(patch.height(), stride, state.nx, state.ny),
        momentum_x: checkpoint::interior_values(patch.momentum_x(), stride, state.nx, state.ny),
        momentum_y: patch
            .momentum_y()
            .map(|momentum_y| checkpoint::interior_values(momentum_y, stride, state.nx, state.ny)),
        bathymetry: checkpoint::interior_values(patch.bathymetry(), stride, state.nx, state.ny),
    };
    snapshot.write(&state.checkpoint_path)?;
    info!(
        path = %state.checkpoint_path.display(),
        sim_time = state.sim_time,
        "wrote checkpoint"
    );
    Ok(())
}
