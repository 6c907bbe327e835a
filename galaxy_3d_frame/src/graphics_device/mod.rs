/// Graphics device module - the hardware collaborators of the render queue
///
/// Everything here is an interface (or a plain value object) implemented by
/// a backend: the GPU context, the command queue, the VRAM allocator, tick
/// counters, and the event channel carrying vblank and completion signals.

// Module declarations
pub mod graphics_device;
pub mod command_queue;
pub mod vram;
pub mod event;
pub mod tick_counter;
pub mod frame_buffer;
pub mod texture;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use command_queue::*;
pub use vram::*;
pub use event::*;
pub use tick_counter::*;
pub use frame_buffer::*;
pub use texture::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
