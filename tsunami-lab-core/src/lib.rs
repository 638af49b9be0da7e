//! # tsunami-lab-core
//!
//! Core library of the tsunami-lab shallow water equation solver.
//!
//! This crate provides the f-wave Riemann solver, the finite volume wave
//! propagation patches, the initial condition setups, file IO for solution
//! frames, stations and checkpoints, and the simulation engine that wires
//! them together.

pub mod config;
pub mod froude;
pub mod io;
pub mod middle_states;
pub mod patches;
pub mod setups;
pub mod simulator;
pub mod solvers;

pub use config::{SimulatorConfig, StationConfig};
pub use patches::{WavePropagation, WavePropagation1d, WavePropagation2d};
pub use setups::Setup;
pub use simulator::{DomainInfo, Metrics, Simulator, SimulatorError};
