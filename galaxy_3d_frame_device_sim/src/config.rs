/// Simulated device configuration

use std::time::Duration;

/// Timing of the simulated console GPU
#[derive(Debug, Clone)]
pub struct SimDeviceConfig {
    /// Time between two vblank interrupts (both screens refresh together)
    pub vblank_interval: Duration,
    /// Time the GPU spends executing one queue entry
    pub entry_latency: Duration,
}

impl Default for SimDeviceConfig {
    fn default() -> Self {
        Self {
            vblank_interval: Duration::from_micros(16_667),
            entry_latency: Duration::from_micros(200),
        }
    }
}
