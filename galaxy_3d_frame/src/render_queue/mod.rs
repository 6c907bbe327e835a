//! Render queue module
//!
//! `RenderQueue` is the single context object of the frame layer. Its
//! operations are split by concern:
//! - `render_queue`: construction, teardown, event dispatch, queue drains
//! - `frame`: the in-frame protocol (begin, draw-on, split, end, sync)
//! - `framerate`: vblank-driven frame counters
//! - `targets`: render target creation, deletion and output binding
//! - `transfer`: synchronous display transfer, texture copy and memory fill

mod render_queue;
mod frame;
mod framerate;
mod targets;
mod transfer;

pub use render_queue::{RenderQueue, RenderQueueStats};
pub use frame::{FrameBeginFlags, FrameEndHook};
pub use framerate::{is_valid_framerate, FramerateLimiter, VBLANK_RATE};

#[cfg(test)]
mod test_utils;
