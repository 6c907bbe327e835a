/// Render target: a drawable GPU output surface.
///
/// A render target wraps a frame buffer and remembers which of its VRAM
/// blocks it is responsible for freeing. Render targets are created and
/// destroyed only through `RenderQueue`, which owns the `TargetManager`.

use slotmap::new_key_type;
use crate::graphics_device::{FrameBuffer, GpuAddress, Screen, Side};

new_key_type! {
    /// Stable key for a RenderTarget within a TargetManager.
    ///
    /// A key becomes invalid only when its own target is deleted; a stale
    /// key is rejected instead of reaching freed memory.
    pub struct RenderTargetKey;
}

/// Output slot a render target can be linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSlot {
    /// Top screen, left eye (the only eye when 3D is off)
    TopLeft = 0,
    /// Top screen, right eye
    TopRight = 1,
    /// Bottom screen
    Bottom = 2,
}

impl OutputSlot {
    /// All slots in registration order
    pub const ALL: [OutputSlot; 3] = [OutputSlot::TopLeft, OutputSlot::TopRight, OutputSlot::Bottom];

    /// Slot for a screen/eye pair (the bottom screen ignores the eye)
    pub fn for_output(screen: Screen, side: Side) -> Self {
        match (screen, side) {
            (Screen::Bottom, _) => OutputSlot::Bottom,
            (Screen::Top, Side::Right) => OutputSlot::TopRight,
            (Screen::Top, Side::Left) => OutputSlot::TopLeft,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Render target record
#[derive(Debug, Clone)]
pub struct RenderTarget {
    frame_buffer: FrameBuffer,
    owns_color: bool,
    owns_depth: bool,
    linked: bool,
    used: bool,
    screen: Screen,
    side: Side,
    transfer_flags: u32,
}

impl RenderTarget {
    /// Internal only, created via RenderQueue::create_render_target*()
    pub(crate) fn new(frame_buffer: FrameBuffer, owns_color: bool, owns_depth: bool) -> Self {
        Self {
            frame_buffer,
            owns_color,
            owns_depth,
            linked: false,
            used: false,
            screen: Screen::Top,
            side: Side::Left,
            transfer_flags: 0,
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Whether deleting this target frees its color buffer
    pub fn owns_color(&self) -> bool {
        self.owns_color
    }

    /// Whether deleting this target frees its depth buffer
    pub fn owns_depth(&self) -> bool {
        self.owns_depth
    }

    /// Whether the target currently occupies an output slot
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Whether the target was drawn to in the current frame
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Transfer engine flags used when copying this target to its screen
    pub fn transfer_flags(&self) -> u32 {
        self.transfer_flags
    }

    pub(crate) fn set_used(&mut self, used: bool) {
        self.used = used;
    }

    pub(crate) fn set_linked(&mut self, linked: bool) {
        self.linked = linked;
    }

    pub(crate) fn set_output(&mut self, screen: Screen, side: Side, transfer_flags: u32) {
        self.screen = screen;
        self.side = side;
        self.transfer_flags = transfer_flags;
    }

    /// VRAM blocks to release when the target is destroyed
    pub(crate) fn owned_allocations(&self) -> impl Iterator<Item = GpuAddress> {
        let color = self.owns_color.then_some(self.frame_buffer.color_buffer);
        let depth = if self.owns_depth { self.frame_buffer.depth_buffer } else { None };
        color.into_iter().chain(depth)
    }
}
