/// Frame controller - the in-frame protocol
///
/// `frame_begin` drains the queue and opens a frame, `frame_draw_on` picks
/// the render target draw commands go to, `frame_split` submits what was
/// recorded so far, and `frame_end` submits the rest together with the
/// display transfers of every output that was drawn to.

use bitflags::bitflags;
use crate::error::Result;
use crate::graphics_device::{
    CommandListFlags, DisplayTransfer, GraphicsDevice, Screen, Side, Timeout, Viewport,
};
use crate::target::{OutputSlot, RenderTargetKey};
use super::render_queue::{RenderQueue, SOURCE};

bitflags! {
    /// Flags for `RenderQueue::frame_begin`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameBeginFlags: u8 {
        /// Fail instead of blocking when the previous frame is still on the GPU
        const NONBLOCK = 1 << 1;
    }
}

/// Hook run at the very start of `frame_end`, while commands can still be recorded
pub type FrameEndHook = Box<dyn FnMut(&mut dyn GraphicsDevice) + Send>;

impl RenderQueue {
    // ===== FRAME PROTOCOL =====

    /// Open a frame
    ///
    /// Returns false without changing anything if a frame is already open,
    /// or if `FrameBeginFlags::NONBLOCK` was given and the GPU is still busy
    /// with the previous frame.
    pub fn frame_begin(&mut self, flags: FrameBeginFlags) -> bool {
        if self.frame.in_frame {
            return false;
        }

        let timeout = if flags.contains(FrameBeginFlags::NONBLOCK) {
            Timeout::Poll
        } else {
            Timeout::Infinite
        };
        if !self.wait_and_clear_queue(timeout) {
            return false;
        }

        self.frame.in_frame = true;
        self.cpu_time.start();
        self.device.reset_command_buffer();
        true
    }

    /// Direct subsequent draw commands to a render target
    ///
    /// Binds its frame buffer and resets the viewport to its full extent.
    /// Returns false if no frame is open or the key is stale.
    pub fn frame_draw_on(&mut self, key: RenderTargetKey) -> bool {
        if !self.frame.in_frame {
            return false;
        }
        let Some(target) = self.targets.render_target_mut(key) else {
            crate::engine_warn!(SOURCE, "frame_draw_on: stale render target key");
            return false;
        };

        target.set_used(true);
        let frame_buffer = *target.frame_buffer();
        self.device.set_frame_buffer(&frame_buffer);
        self.device.set_viewport(Viewport {
            x: 0,
            y: 0,
            width: frame_buffer.width,
            height: frame_buffer.height,
        });
        true
    }

    /// Submit the commands recorded so far without closing the frame
    pub fn frame_split(&mut self, flags: CommandListFlags) {
        if !self.frame.in_frame {
            return;
        }
        if let Some(list) = self.device.split_command_list() {
            self.queue.process_command_list(list, flags);
        }
    }

    /// Close the frame and hand it to the GPU
    ///
    /// Display transfers are queued for every linked target drawn to in
    /// this frame; the matching screens swap once the queue completes.
    /// Unless `CommandListFlags::FLUSH` is given, the whole linear heap is
    /// flushed first.
    pub fn frame_end(&mut self, flags: CommandListFlags) {
        if !self.frame.in_frame {
            return;
        }

        if let Some(hook) = self.frame_end_hook.as_mut() {
            hook(self.device.as_mut());
        }

        self.frame_split(flags);
        self.device.detach_command_buffer();
        self.cpu_time.update();
        self.frame.in_frame = false;

        if !flags.contains(CommandListFlags::FLUSH) {
            self.device.flush_linear_heap();
        }

        self.frame.top_stereo = false;
        for slot in OutputSlot::ALL.into_iter().rev() {
            let Some(key) = self.targets.linked_target(slot) else { continue };
            let Some(target) = self.targets.render_target_mut(key) else { continue };
            if !target.is_used() {
                continue;
            }
            target.set_used(false);

            let (screen, side) = (target.screen(), target.side());
            let frame_buffer = *target.frame_buffer();
            let transfer = DisplayTransfer {
                input: frame_buffer.color_buffer,
                input_dim: frame_buffer.transfer_dim(),
                output: self.device.screen_frame_buffer(screen, side),
                output_dim: frame_buffer.transfer_dim(),
                flags: target.transfer_flags(),
            };
            self.queue.display_transfer(&transfer);

            self.frame.need_swap[screen.index()] = true;
            if screen == Screen::Top && side == Side::Right {
                self.frame.top_stereo = true;
            }
        }

        self.frame.measure_gpu_time = true;
        self.gpu_time.start();
        self.queue.run();
        self.stats.frames_submitted += 1;
    }

    /// Install a hook run at the start of every `frame_end`
    pub fn set_frame_end_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut dyn GraphicsDevice) + Send + 'static,
    {
        self.frame_end_hook = Some(Box::new(hook));
    }

    pub fn clear_frame_end_hook(&mut self) {
        self.frame_end_hook = None;
    }

    // ===== PACING =====

    /// Block until both screens' frame counters have advanced
    ///
    /// Vblank notifications must be enabled, or this never returns.
    pub fn frame_sync(&mut self) -> Result<()> {
        let start = self.limiter.frame_counters();
        loop {
            let current = self.limiter.frame_counters();
            if current[0] != start[0] && current[1] != start[1] {
                return Ok(());
            }
            self.wait_for_event()?;
        }
    }

    /// Frame counter of a screen (wraps on overflow)
    ///
    /// Vblanks are counted when their events are dispatched, so pending
    /// events are dispatched first. A render loop may spin on this value.
    pub fn frame_counter(&mut self, screen: Screen) -> u32 {
        self.poll_events();
        self.limiter.frame_counter(screen)
    }

    /// Change the target framerate; returns the previous one
    ///
    /// Values outside (0, 60] are ignored.
    pub fn set_framerate(&mut self, fps: f32) -> f32 {
        let previous = self.limiter.set_framerate(fps);
        if self.limiter.framerate() != fps {
            crate::engine_warn!(SOURCE, "Framerate {} rejected, keeping {}", fps, previous);
        }
        previous
    }

    pub fn framerate(&self) -> f32 {
        self.limiter.framerate()
    }

    // ===== TIMING =====

    /// CPU time spent in the last frame, in milliseconds
    pub fn processing_time(&self) -> f32 {
        self.cpu_time.read()
    }

    /// GPU time spent executing the last frame, in milliseconds
    pub fn drawing_time(&self) -> f32 {
        self.gpu_time.read()
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
