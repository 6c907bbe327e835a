#![allow(dead_code)]
//! Sim test utilities - render queues running on the simulated device
//!
//! Every test gets its own simulated GPU (worker and ticker threads are
//! cheap), so tests run in parallel without sharing hardware state. The
//! vblank interval is shortened to keep frame-paced tests fast.

use std::time::Duration;
use galaxy_3d_frame::galaxy3d::{RenderQueue, RenderQueueConfig, ViolationPolicy};
use galaxy_3d_frame::galaxy3d::device::{ColorFormat, DepthFormat, Screen, Side};
use galaxy_3d_frame::galaxy3d::target::RenderTargetKey;
use galaxy_3d_frame_device_sim::galaxy3d::{SimDeviceConfig, SimGpu, SimGpuHandle};

/// Display transfer flags used for every linked test target
pub const TRANSFER_FLAGS: u32 = 0x1000;

/// Fast simulated GPU configuration (4 ms vblank, 50 us per queue entry)
pub fn fast_config() -> SimDeviceConfig {
    SimDeviceConfig {
        vblank_interval: Duration::from_millis(4),
        entry_latency: Duration::from_micros(50),
    }
}

/// Render queue on a fresh simulated GPU; violations are returned as errors
pub fn sim_render_queue() -> (RenderQueue, SimGpuHandle) {
    sim_render_queue_with(fast_config())
}

pub fn sim_render_queue_with(config: SimDeviceConfig) -> (RenderQueue, SimGpuHandle) {
    let gpu = SimGpu::new(config).expect("Failed to start simulated GPU");
    gpu.into_render_queue(RenderQueueConfig {
        violation_policy: ViolationPolicy::Propagate,
        ..Default::default()
    })
}

/// Top (left eye) and bottom screen targets, both linked
pub fn screen_targets(rq: &mut RenderQueue) -> (RenderTargetKey, RenderTargetKey) {
    let top = rq
        .create_render_target(400, 240, ColorFormat::Rgba8, Some(DepthFormat::Depth24Stencil8))
        .expect("Failed to create top target");
    let bottom = rq
        .create_render_target(320, 240, ColorFormat::Rgba8, Some(DepthFormat::Depth16))
        .expect("Failed to create bottom target");
    rq.set_render_target_output(Some(top), Screen::Top, Side::Left, TRANSFER_FLAGS).unwrap();
    rq.set_render_target_output(Some(bottom), Screen::Bottom, Side::Left, TRANSFER_FLAGS).unwrap();
    (top, bottom)
}
