//! Render target module
//!
//! Render targets are the surfaces the GPU draws into. The registry keeps
//! them in creation order and tracks which ones are linked to the three
//! display outputs.

mod render_target;
mod target_manager;

pub use render_target::{OutputSlot, RenderTarget, RenderTargetKey};
pub use target_manager::TargetManager;
