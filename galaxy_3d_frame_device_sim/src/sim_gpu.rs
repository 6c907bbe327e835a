/// Simulated GPU assembly
///
/// `SimGpu::new` builds the three collaborators a render queue needs plus
/// a handle that stays with the caller. The handle stands in for the
/// application side of the hardware: it records draw commands into the
/// attached command buffer and reads back what the GPU did.

use std::sync::{Arc, Mutex};
use galaxy_3d_frame::galaxy3d::{RenderQueue, RenderQueueConfig, Result};
use galaxy_3d_frame::galaxy3d::device::{
    CommandQueue, FrameBuffer, GpuAddress, GraphicsDevice, Screen, Side, VramAllocator, VramBank,
    Viewport,
};
use crate::config::SimDeviceConfig;
use crate::debug::{SimStats, SimStatsTracker};
use crate::sim_command_queue::SimCommandQueue;
use crate::sim_device::{display_buffer, lock, CommandBufferState, DisplayState, SimGraphicsDevice};
use crate::sim_vram::{lock_vram, SimVramAllocator, VramState};

const SOURCE: &str = "galaxy3d::sim::Gpu";

/// The collaborators of one simulated GPU
pub struct SimGpu {
    pub handle: SimGpuHandle,
    pub device: Box<dyn GraphicsDevice>,
    pub queue: Box<dyn CommandQueue>,
    pub vram: Box<dyn VramAllocator>,
}

impl SimGpu {
    /// Start the simulated GPU (queue worker and vblank ticker threads)
    pub fn new(config: SimDeviceConfig) -> Result<Self> {
        let stats = Arc::new(SimStatsTracker::default());
        let commands = Arc::new(Mutex::new(CommandBufferState::default()));
        let display = Arc::new(Mutex::new(DisplayState::default()));
        let vram_state = Arc::new(Mutex::new(VramState::new()));

        let queue = SimCommandQueue::new(config.entry_latency, stats.clone())?;
        let device = SimGraphicsDevice::new(
            config.vblank_interval,
            commands.clone(),
            display.clone(),
            stats.clone(),
        )?;
        let vram = SimVramAllocator::new(vram_state.clone());

        galaxy_3d_frame::engine_info!(SOURCE,
            "Simulated GPU started (vblank every {:?}, {:?} per queue entry)",
            config.vblank_interval, config.entry_latency);

        Ok(Self {
            handle: SimGpuHandle { stats, commands, display, vram: vram_state },
            device: Box::new(device),
            queue: Box::new(queue),
            vram: Box::new(vram),
        })
    }

    /// Hand the collaborators to a new render queue, keeping the handle
    pub fn into_render_queue(self, config: RenderQueueConfig) -> (RenderQueue, SimGpuHandle) {
        let rq = RenderQueue::new(self.device, self.queue, self.vram, config);
        (rq, self.handle)
    }
}

/// Caller-side view of a simulated GPU
#[derive(Clone)]
pub struct SimGpuHandle {
    stats: Arc<SimStatsTracker>,
    commands: Arc<Mutex<CommandBufferState>>,
    display: Arc<Mutex<DisplayState>>,
    vram: Arc<Mutex<VramState>>,
}

impl SimGpuHandle {
    /// Record draw commands into the attached command buffer
    ///
    /// Returns false when no frame has a command buffer attached or the
    /// buffer is full.
    pub fn record_commands(&self, words: u32) -> bool {
        lock(&self.commands).record(words)
    }

    pub fn stats(&self) -> SimStats {
        self.stats.get_stats()
    }

    /// Frame buffer bound by the last draw-on
    pub fn bound_frame_buffer(&self) -> Option<FrameBuffer> {
        lock(&self.commands).frame_buffer
    }

    pub fn viewport(&self) -> Option<Viewport> {
        lock(&self.commands).viewport
    }

    /// Display buffer currently shown on a screen
    pub fn front_buffer(&self, screen: Screen, side: Side) -> GpuAddress {
        display_buffer(screen, side, lock(&self.display).front[screen.index()])
    }

    /// Whether the top screen last swapped in stereo
    pub fn is_top_stereo(&self) -> bool {
        lock(&self.display).stereo
    }

    /// Number of live VRAM allocations
    pub fn vram_allocations(&self) -> usize {
        lock_vram(&self.vram).live_allocations()
    }

    /// Bytes allocated in VRAM
    pub fn vram_used(&self) -> u32 {
        lock_vram(&self.vram).used_bytes()
    }

    pub fn vram_free(&self, bank: VramBank) -> u32 {
        lock_vram(&self.vram).free_bytes(bank)
    }
}
