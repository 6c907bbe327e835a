/*!
# Galaxy 3D Frame

Frame lifecycle and command queue synchronization for a fixed-function
console GPU.

This crate provides the platform-agnostic frame layer: it decides when
command lists reach the GPU, which render targets are copied to which
screen, when screens swap, and how auxiliary transfers share the single
command queue with rendering. The hardware itself (command encoding, VRAM,
the command queue, vblank interrupts) is reached through traits that a
backend implements.

## Architecture

- **RenderQueue**: Context object owning all frame state (begin/draw-on/split/end, sync, transfers)
- **TargetManager**: Render target registry with stable keys and output slots
- **FramerateLimiter**: Vblank-driven frame counters with fractional frame skipping
- **GraphicsDevice / CommandQueue / VramAllocator / TickCounter**: Backend traits

Backend implementations provide concrete types that implement these traits.

Vblank and queue-completion signals arrive on a channel and are dispatched
on the caller's thread: by `poll_events`, `frame_counter`, `frame_sync` and
every blocking wait of the render queue.
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod graphics_device;
pub mod target;
pub mod render_queue;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result, ViolationPolicy};

    // Engine (global logger host)
    pub use crate::engine::Engine;

    // Render queue context and configuration
    pub use crate::config::RenderQueueConfig;
    pub use crate::render_queue::{
        FrameBeginFlags, FrameEndHook, FramerateLimiter, RenderQueue, RenderQueueStats,
        VBLANK_RATE,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are exported at the crate root for backend crates
    }

    // Device sub-module with the backend traits and value objects
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Render target sub-module
    pub mod target {
        pub use crate::target::*;
    }
}
