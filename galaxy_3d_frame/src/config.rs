/// Render queue configuration

use crate::error::ViolationPolicy;

/// Render queue configuration
#[derive(Debug, Clone)]
pub struct RenderQueueConfig {
    /// Initial target framerate, in (0, 60]; out-of-range values fall back to 60
    pub framerate: f32,
    /// What happens when the frame protocol is violated
    pub violation_policy: ViolationPolicy,
}

impl Default for RenderQueueConfig {
    fn default() -> Self {
        Self {
            framerate: crate::render_queue::VBLANK_RATE,
            violation_policy: ViolationPolicy::Abort,
        }
    }
}
