/// GraphicsDevice trait - the GPU context collaborator
///
/// Command encoding, screen frame buffers and vblank interrupts belong to
/// the backend. The render queue only drives them through this trait.

use crate::graphics_device::{CommandListSpan, EventSender, FrameBuffer, GpuAddress, TickCounter};

/// Physical display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Top screen (stereoscopic capable)
    Top,
    /// Bottom screen
    Bottom,
}

impl Screen {
    /// Index used for per-display state (0 = top, 1 = bottom)
    pub fn index(self) -> usize {
        match self {
            Screen::Top => 0,
            Screen::Bottom => 1,
        }
    }
}

/// Stereo eye of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// GPU context
///
/// Owns the command buffer being recorded, the currently bound frame
/// buffer and viewport, the screens' display buffers and the vblank
/// interrupt sources.
pub trait GraphicsDevice: Send {
    /// Point command recording at the start of the primary command buffer
    fn reset_command_buffer(&mut self);

    /// Stop command recording (no buffer bound)
    fn detach_command_buffer(&mut self);

    /// Close the commands recorded since the last split
    ///
    /// Returns the closed region, or None if nothing was recorded.
    fn split_command_list(&mut self) -> Option<CommandListSpan>;

    /// Bind the frame buffer subsequent draws render into
    fn set_frame_buffer(&mut self, frame_buffer: &FrameBuffer);

    /// Set the viewport for subsequent draws
    fn set_viewport(&mut self, viewport: Viewport);

    /// Flush the data cache over the whole linear heap
    fn flush_linear_heap(&mut self);

    /// Display buffer currently being filled for a screen/eye
    fn screen_frame_buffer(&self, screen: Screen, side: Side) -> GpuAddress;

    /// Present the filled display buffer of a screen
    fn swap_buffers(&mut self, screen: Screen, stereo: bool);

    /// Route (or stop routing) the vblank interrupt of a screen to a sink
    fn set_vblank_notify(&mut self, screen: Screen, notify: Option<EventSender>);

    /// Create a tick counter
    fn create_tick_counter(&self) -> Box<dyn TickCounter>;
}
