/// RenderQueue - frame state, event dispatch and queue synchronization
///
/// The render queue owns every piece of state the frame protocol touches:
/// the in-frame / safe-transfer flags, pending swaps, the framerate limiter,
/// the render target registry and the hardware collaborators. Vblank and
/// queue-completion signals arrive as `GpuEvent`s on a channel and are
/// dispatched on the caller's thread, either by `poll_events` or inside one
/// of the blocking waits.

use std::sync::mpsc::Receiver;
use crate::config::RenderQueueConfig;
use crate::error::Result;
use crate::graphics_device::{
    event_channel, CommandQueue, EventSender, GpuEvent, GraphicsDevice, Screen, TickCounter,
    Timeout, VramAllocator,
};
use crate::target::{RenderTarget, TargetManager};
use super::frame::FrameEndHook;
use super::framerate::{is_valid_framerate, FramerateLimiter, VBLANK_RATE};

pub(super) const SOURCE: &str = "galaxy3d::RenderQueue";

/// Render queue statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderQueueStats {
    /// Frames handed to the command queue by frame_end
    pub frames_submitted: u64,
    /// Queue completion events dispatched
    pub queue_completions: u64,
    /// Standalone synchronous transfers whose queue run completed
    pub safe_transfers_completed: u64,
    /// Buffer swaps performed, per screen (0 = top, 1 = bottom)
    pub swaps: [u64; 2],
    /// Successful wait-stop-clear cycles on the command queue
    pub queue_drains: u64,
}

/// Per-frame protocol flags
#[derive(Debug, Default)]
pub(super) struct FrameState {
    pub(super) in_frame: bool,
    pub(super) in_safe_transfer: bool,
    pub(super) measure_gpu_time: bool,
    /// Screens whose display transfer was issued and still need a swap
    pub(super) need_swap: [bool; 2],
    pub(super) top_stereo: bool,
}

/// Frame and render target context for one GPU
///
/// # Example
///
/// ```ignore
/// let mut rq = RenderQueue::new(device, queue, vram, RenderQueueConfig::default());
/// let top = rq.create_render_target(400, 240, ColorFormat::Rgba8, Some(DepthFormat::Depth24Stencil8))?;
/// rq.set_render_target_output(Some(top), Screen::Top, Side::Left, flags)?;
///
/// loop {
///     rq.frame_begin(FrameBeginFlags::empty());
///     rq.frame_draw_on(top);
///     // ... record draw commands ...
///     rq.frame_end(CommandListFlags::empty());
///     rq.frame_sync()?;
/// }
/// ```
pub struct RenderQueue {
    pub(super) device: Box<dyn GraphicsDevice>,
    pub(super) queue: Box<dyn CommandQueue>,
    pub(super) vram: Box<dyn VramAllocator>,
    pub(super) config: RenderQueueConfig,
    events: Receiver<GpuEvent>,
    event_sender: EventSender,
    pub(super) targets: TargetManager,
    pub(super) frame: FrameState,
    pub(super) limiter: FramerateLimiter,
    pub(super) cpu_time: Box<dyn TickCounter>,
    pub(super) gpu_time: Box<dyn TickCounter>,
    pub(super) frame_end_hook: Option<FrameEndHook>,
    pub(super) stats: RenderQueueStats,
    torn_down: bool,
}

impl RenderQueue {
    /// Bind the collaborators and start the command queue
    ///
    /// Registers both vblank notifications and the queue's completion
    /// notification on a fresh event channel.
    pub fn new(
        device: Box<dyn GraphicsDevice>,
        queue: Box<dyn CommandQueue>,
        vram: Box<dyn VramAllocator>,
        config: RenderQueueConfig,
    ) -> Self {
        if !is_valid_framerate(config.framerate) {
            crate::engine_warn!(SOURCE,
                "Configured framerate {} outside (0, {}], using {}",
                config.framerate, VBLANK_RATE, VBLANK_RATE);
        }

        let (event_sender, events) = event_channel();
        let cpu_time = device.create_tick_counter();
        let gpu_time = device.create_tick_counter();

        let mut rq = Self {
            device,
            queue,
            vram,
            limiter: FramerateLimiter::new(config.framerate),
            config,
            events,
            event_sender,
            targets: TargetManager::new(),
            frame: FrameState::default(),
            cpu_time,
            gpu_time,
            frame_end_hook: None,
            stats: RenderQueueStats::default(),
            torn_down: false,
        };

        rq.enable_vblank();
        rq.queue.bind(Some(rq.event_sender.clone()));
        rq.queue.run();

        crate::engine_info!(SOURCE, "Render queue initialized ({} fps)", rq.limiter.framerate());
        rq
    }

    /// Route both vblank interrupts into the frame counters
    pub fn enable_vblank(&mut self) {
        self.device.set_vblank_notify(Screen::Top, Some(self.event_sender.clone()));
        self.device.set_vblank_notify(Screen::Bottom, Some(self.event_sender.clone()));
    }

    /// Stop routing vblank interrupts (frame counters freeze)
    pub fn disable_vblank(&mut self) {
        self.device.set_vblank_notify(Screen::Top, None);
        self.device.set_vblank_notify(Screen::Bottom, None);
    }

    /// Drain, unbind, and destroy every render target
    ///
    /// Called automatically on drop if not called explicitly.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if self.frame.in_frame {
            crate::engine_warn!(SOURCE, "Shutting down inside an open frame; frame discarded");
            self.frame.in_frame = false;
            self.device.detach_command_buffer();
        }

        self.wait_and_clear_queue(Timeout::Infinite);
        self.queue.bind(None);
        self.disable_vblank();

        self.targets.clear_links();
        let targets = self.targets.take_all();
        let count = targets.len();
        for target in &targets {
            self.release_vram(target);
        }

        crate::engine_info!(SOURCE, "Render queue shut down ({} render targets destroyed)", count);
    }

    /// Block until the command queue has finished
    ///
    /// The queue is stopped and cleared afterwards.
    pub fn wait_done(&mut self) {
        self.wait_and_clear_queue(Timeout::Infinite);
    }

    /// Wait for the queue, reconcile its completion, then stop and clear it
    ///
    /// Returns false (and changes nothing) if `Timeout::Poll` was requested
    /// and the queue is still busy.
    pub(super) fn wait_and_clear_queue(&mut self, timeout: Timeout) -> bool {
        if !self.queue.wait(timeout) {
            return false;
        }
        // Completion events are posted before the queue reports done
        self.poll_events();
        self.queue.stop();
        self.queue.clear();
        self.stats.queue_drains += 1;
        true
    }

    /// Dispatch every pending event without blocking
    ///
    /// Returns the number of events dispatched.
    pub fn poll_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            self.dispatch_event(event);
            count += 1;
        }
        count
    }

    /// Block for the next event and dispatch it
    pub(super) fn wait_for_event(&mut self) -> Result<GpuEvent> {
        let Ok(event) = self.events.recv() else {
            crate::engine_bail!(SOURCE, "Event channel closed");
        };
        self.dispatch_event(event);
        Ok(event)
    }

    fn dispatch_event(&mut self, event: GpuEvent) {
        match event {
            GpuEvent::VBlank(screen) => {
                if self.limiter.on_vblank(screen) {
                    crate::engine_trace!(SOURCE, "{:?} frame {}", screen, self.limiter.frame_counter(screen));
                }
            }
            GpuEvent::QueueFinished => self.on_queue_finish(),
            GpuEvent::DisplayTransferDone | GpuEvent::MemoryFillDone => {}
        }
    }

    fn on_queue_finish(&mut self) {
        self.stats.queue_completions += 1;

        if self.frame.measure_gpu_time {
            self.gpu_time.update();
            self.frame.measure_gpu_time = false;
        }

        if self.frame.in_safe_transfer {
            self.frame.in_safe_transfer = false;
            self.stats.safe_transfers_completed += 1;
            if self.frame.in_frame {
                // A frame opened before this completion was seen: leave the
                // queue as an already-drained queue for the new frame
                crate::engine_debug!(SOURCE, "Safe transfer completed inside an open frame; queue cleared");
                self.queue.stop();
                self.queue.clear();
            }
            return;
        }

        for screen in [Screen::Top, Screen::Bottom] {
            let i = screen.index();
            if self.frame.need_swap[i] {
                let stereo = screen == Screen::Top && self.frame.top_stereo;
                self.device.swap_buffers(screen, stereo);
                self.frame.need_swap[i] = false;
                self.stats.swaps[i] += 1;
            }
        }
    }

    /// Free the VRAM a destroyed target owned
    pub(super) fn release_vram(&mut self, target: &RenderTarget) {
        for address in target.owned_allocations() {
            self.vram.free(address);
        }
    }

    // ===== STATE QUERIES =====

    /// Whether a frame is open (between frame_begin and frame_end)
    pub fn in_frame(&self) -> bool {
        self.frame.in_frame
    }

    /// Whether a standalone synchronous transfer is still awaiting its queue completion
    pub fn in_safe_transfer(&self) -> bool {
        self.frame.in_safe_transfer
    }

    pub fn stats(&self) -> RenderQueueStats {
        self.stats
    }

    pub fn config(&self) -> &RenderQueueConfig {
        &self.config
    }
}

impl Drop for RenderQueue {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "render_queue_tests.rs"]
mod tests;
