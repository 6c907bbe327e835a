/// Shared fixtures for the render queue unit tests

use crate::config::RenderQueueConfig;
use crate::error::ViolationPolicy;
use crate::graphics_device::mock_graphics_device::MockGpu;
use crate::graphics_device::{ColorFormat, Screen, Side};
use crate::target::RenderTargetKey;
use super::RenderQueue;

/// Render queue on mock hardware; violations are returned as errors
pub(crate) fn mock_render_queue() -> (RenderQueue, MockGpu) {
    let (gpu, device, queue, vram) = MockGpu::new();
    let config = RenderQueueConfig {
        violation_policy: ViolationPolicy::Propagate,
        ..Default::default()
    };
    let rq = RenderQueue::new(device, queue, vram, config);
    gpu.clear_calls();
    (rq, gpu)
}

/// A 400x240 color-only target linked to the given output
pub(crate) fn linked_target(rq: &mut RenderQueue, screen: Screen, side: Side) -> RenderTargetKey {
    let key = rq.create_render_target(400, 240, ColorFormat::Rgba8, None).unwrap();
    rq.set_render_target_output(Some(key), screen, side, 0x1000).unwrap();
    key
}
