/// Vblank-driven framerate limiter and per-screen frame counters

use crate::graphics_device::Screen;

/// Hardware vertical blank rate (vblanks per second)
pub const VBLANK_RATE: f32 = 60.0;

/// Whether a framerate can be used as a target
pub fn is_valid_framerate(fps: f32) -> bool {
    fps > 0.0 && fps <= VBLANK_RATE
}

/// Fractional frame skipper
///
/// Every vblank subtracts the target framerate from the screen's
/// accumulator; when it drops to zero or below the accumulator is
/// replenished by the vblank rate and the screen's frame counter advances.
/// At 60 fps every vblank counts, at 30 fps every other one.
#[derive(Debug, Clone)]
pub struct FramerateLimiter {
    framerate: f32,
    accumulators: [f32; 2],
    frame_counters: [u32; 2],
}

impl FramerateLimiter {
    pub fn new(framerate: f32) -> Self {
        let framerate = if is_valid_framerate(framerate) { framerate } else { VBLANK_RATE };
        Self {
            framerate,
            accumulators: [framerate; 2],
            frame_counters: [0; 2],
        }
    }

    /// Account one vblank of a screen; returns true if its frame counter advanced
    pub fn on_vblank(&mut self, screen: Screen) -> bool {
        let i = screen.index();
        self.accumulators[i] -= self.framerate;
        if self.accumulators[i] <= 0.0 {
            self.accumulators[i] += VBLANK_RATE;
            self.frame_counters[i] = self.frame_counters[i].wrapping_add(1);
            true
        } else {
            false
        }
    }

    /// Change the target framerate
    ///
    /// Values outside (0, 60] are ignored. Returns the framerate in effect
    /// before the call either way.
    pub fn set_framerate(&mut self, fps: f32) -> f32 {
        let previous = self.framerate;
        if is_valid_framerate(fps) {
            self.framerate = fps;
            self.accumulators = [fps; 2];
        }
        previous
    }

    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    pub fn frame_counter(&self, screen: Screen) -> u32 {
        self.frame_counters[screen.index()]
    }

    pub fn frame_counters(&self) -> [u32; 2] {
        self.frame_counters
    }
}

#[cfg(test)]
#[path = "framerate_tests.rs"]
mod tests;
