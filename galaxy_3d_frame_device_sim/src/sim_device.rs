/// Simulated GPU context: command buffer, screens and vblank interrupts
///
/// Each screen has two display buffers; `screen_frame_buffer` hands out the
/// back one and `swap_buffers` flips them. A ticker thread raises both
/// vblank interrupts once per `vblank_interval`.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use galaxy_3d_frame::galaxy3d::{Error, Result};
use galaxy_3d_frame::galaxy3d::device::{
    CommandListSpan, EventSender, FrameBuffer, GpuAddress, GpuEvent, GraphicsDevice, Screen, Side,
    TickCounter, Viewport,
};
use crate::debug::SimStatsTracker;
use crate::sim_tick_counter::SimTickCounter;

const SOURCE: &str = "galaxy3d::sim::Device";

/// Start of the command buffer in linear memory
pub const COMMAND_BUFFER_BASE: u32 = 0x1400_0000;
/// Command buffer capacity, in 32-bit words
pub const COMMAND_BUFFER_WORDS: u32 = 0x2_0000;

const TOP_BUFFER_BASE: u32 = 0x1F00_0000;
const BOTTOM_BUFFER_BASE: u32 = 0x1F20_0000;
const DISPLAY_BUFFER_STRIDE: u32 = 0x0005_0000;

// ============================================================================
// Shared state
// ============================================================================

/// Command buffer recording cursor
#[derive(Debug, Default)]
pub(crate) struct CommandBufferState {
    pub(crate) attached: bool,
    pub(crate) recorded_words: u32,
    pub(crate) split_start: u32,
    pub(crate) frame_buffer: Option<FrameBuffer>,
    pub(crate) viewport: Option<Viewport>,
}

impl CommandBufferState {
    /// Append draw commands; false if no buffer is attached or it is full
    pub(crate) fn record(&mut self, words: u32) -> bool {
        if !self.attached {
            return false;
        }
        match self.recorded_words.checked_add(words) {
            Some(total) if total <= COMMAND_BUFFER_WORDS => {
                self.recorded_words = total;
                true
            }
            _ => false,
        }
    }
}

/// Display state touched by the ticker thread and the device
#[derive(Debug, Default)]
pub(crate) struct DisplayState {
    vblank: [Option<EventSender>; 2],
    /// Index of the buffer being shown, per screen
    pub(crate) front: [usize; 2],
    pub(crate) stereo: bool,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Vblank ticker
// ============================================================================

struct VblankTicker {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl VblankTicker {
    fn spawn(
        interval: Duration,
        display: Arc<Mutex<DisplayState>>,
        stats: Arc<SimStatsTracker>,
    ) -> Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let thread = thread::Builder::new()
            .name("sim-vblank".to_string())
            .spawn(move || {
                // Any message or a dropped sender ends the ticker
                while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(interval) {
                    let display = lock(&display);
                    for screen in [Screen::Top, Screen::Bottom] {
                        if let Some(sink) = &display.vblank[screen.index()] {
                            if sink.send(GpuEvent::VBlank(screen)).is_ok() {
                                stats.increment_vblank(screen);
                            }
                        }
                    }
                }
            })
            .map_err(|e| Error::InitializationFailed(format!("vblank ticker: {}", e)))?;

        Ok(Self { stop: Some(stop), thread: Some(thread) })
    }
}

impl Drop for VblankTicker {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                galaxy_3d_frame::engine_error!(SOURCE, "Vblank ticker panicked");
            }
        }
    }
}

// ============================================================================
// SimGraphicsDevice
// ============================================================================

/// Simulated GPU context
pub struct SimGraphicsDevice {
    commands: Arc<Mutex<CommandBufferState>>,
    display: Arc<Mutex<DisplayState>>,
    stats: Arc<SimStatsTracker>,
    _ticker: VblankTicker,
}

impl SimGraphicsDevice {
    pub(crate) fn new(
        vblank_interval: Duration,
        commands: Arc<Mutex<CommandBufferState>>,
        display: Arc<Mutex<DisplayState>>,
        stats: Arc<SimStatsTracker>,
    ) -> Result<Self> {
        let ticker = VblankTicker::spawn(vblank_interval, display.clone(), stats.clone())?;
        Ok(Self { commands, display, stats, _ticker: ticker })
    }
}

/// Address of one display buffer
pub(crate) fn display_buffer(screen: Screen, side: Side, index: usize) -> GpuAddress {
    let (base, slot) = match (screen, side) {
        (Screen::Top, Side::Left) => (TOP_BUFFER_BASE, 0),
        (Screen::Top, Side::Right) => (TOP_BUFFER_BASE, 2),
        (Screen::Bottom, _) => (BOTTOM_BUFFER_BASE, 0),
    };
    GpuAddress(base + (slot + index as u32) * DISPLAY_BUFFER_STRIDE)
}

impl GraphicsDevice for SimGraphicsDevice {
    fn reset_command_buffer(&mut self) {
        let mut commands = lock(&self.commands);
        commands.attached = true;
        commands.recorded_words = 0;
        commands.split_start = 0;
    }

    fn detach_command_buffer(&mut self) {
        lock(&self.commands).attached = false;
    }

    fn split_command_list(&mut self) -> Option<CommandListSpan> {
        let mut commands = lock(&self.commands);
        let size_words = commands.recorded_words - commands.split_start;
        if size_words == 0 {
            return None;
        }
        let span = CommandListSpan {
            address: GpuAddress(COMMAND_BUFFER_BASE + commands.split_start * 4),
            size_words,
        };
        commands.split_start = commands.recorded_words;
        Some(span)
    }

    fn set_frame_buffer(&mut self, frame_buffer: &FrameBuffer) {
        lock(&self.commands).frame_buffer = Some(*frame_buffer);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        lock(&self.commands).viewport = Some(viewport);
    }

    fn flush_linear_heap(&mut self) {
        self.stats.increment_linear_heap_flush();
    }

    fn screen_frame_buffer(&self, screen: Screen, side: Side) -> GpuAddress {
        let back = 1 - lock(&self.display).front[screen.index()];
        display_buffer(screen, side, back)
    }

    fn swap_buffers(&mut self, screen: Screen, stereo: bool) {
        let mut display = lock(&self.display);
        let i = screen.index();
        display.front[i] = 1 - display.front[i];
        if screen == Screen::Top {
            display.stereo = stereo;
        }
        self.stats.increment_swap(screen, stereo);
    }

    fn set_vblank_notify(&mut self, screen: Screen, notify: Option<EventSender>) {
        lock(&self.display).vblank[screen.index()] = notify;
    }

    fn create_tick_counter(&self) -> Box<dyn TickCounter> {
        Box::new(SimTickCounter::default())
    }
}

#[cfg(test)]
#[path = "sim_device_tests.rs"]
mod tests;
