//! Riemann solvers for the one-dimensional shallow water equations.

pub mod fwave;
