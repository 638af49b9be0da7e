//! Host RAM and CPU telemetry.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::System;

const BYTES_TO_GIB: f64 = 0.00000000093132257;

// CPU usage is a delta; the handle must outlive single snapshots.
static SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| Mutex::new(System::new()));

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub total_ram_gib: f64,
    pub used_ram_gib: f64,
    pub cpu_usage_percent: Vec<f32>,
}

pub fn snapshot() -> SystemInfo {
    let mut system = SYSTEM.lock();
    system.refresh_memory();
    system.refresh_cpu_usage();
    SystemInfo {
        total_ram_gib: system.total_memory() as f64 * BYTES_TO_GIB,
        used_ram_gib: system.used_memory() as f64 * BYTES_TO_GIB,
        cpu_usage_percent: system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reports_host_memory() {
        let info = snapshot();
        assert!(info.total_ram_gib > 0.0);
        assert!(info.used_ram_gib <= info.total_ram_gib);
        assert!(!info.cpu_usage_percent.is_empty());
    }
}
