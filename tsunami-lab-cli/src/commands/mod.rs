//! CLI command implementations.

pub mod client;
pub mod run;
pub mod sanity_check;

pub use client::run_client;
pub use run::run_simulation;
pub use sanity_check::run_sanity_check;
