/// CommandQueue trait - asynchronous GPU command submission channel
///
/// The queue holds an ordered list of entries (command lists and transfer
/// engine operations). Entries added while the queue is stopped are kept
/// until the next `run`. Entries execute in submission order.

use bitflags::bitflags;
use crate::graphics_device::{EventSender, GpuAddress};

/// How long a queue wait may block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until the queue is done
    Infinite,
    /// Report the current state without blocking
    Poll,
}

bitflags! {
    /// Flags passed along with a submitted command list
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandListFlags: u8 {
        /// Let the GPU update its internal state registers after the list
        const UPDATE_STATE = 1 << 0;
        /// Flush the data cache for the command list region before execution
        ///
        /// On frame end this also means the caller takes over cache
        /// maintenance: the whole-linear-heap flush is skipped.
        const FLUSH = 1 << 1;
    }
}

/// A command list region in linear memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandListSpan {
    /// Start of the list
    pub address: GpuAddress,
    /// Length of the list in 32-bit words
    pub size_words: u32,
}

/// Display transfer: copy and convert a rendered buffer into a display buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTransfer {
    pub input: GpuAddress,
    pub input_dim: u32,
    pub output: GpuAddress,
    pub output_dim: u32,
    /// Transfer engine flags, passed through untouched
    pub flags: u32,
}

/// Texture copy: raw copy with gaps, done by the transfer engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCopy {
    pub input: GpuAddress,
    pub input_dim: u32,
    pub output: GpuAddress,
    pub output_dim: u32,
    pub size: u32,
    pub flags: u32,
}

/// One region of a memory fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRegion {
    pub start: GpuAddress,
    pub end: GpuAddress,
    pub value: u32,
    pub control: u16,
}

/// Memory fill of up to two regions at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryFill {
    pub regions: [Option<FillRegion>; 2],
}

/// Asynchronous hardware command queue
///
/// A bound queue posts `GpuEvent::QueueFinished` when the last entry of a
/// run completes, then the completion event of that entry's engine
/// (`DisplayTransferDone` for transfers and texture copies, `MemoryFillDone`
/// for fills). Events of earlier entries are posted as they complete.
pub trait CommandQueue: Send {
    /// Bind the queue to the hardware and set (or clear) its notification sink
    fn bind(&mut self, notify: Option<EventSender>);

    /// Start executing pending entries
    fn run(&mut self);

    /// Stop after the entry currently executing
    fn stop(&mut self);

    /// Drop all entries (queue must be stopped)
    fn clear(&mut self);

    /// Wait for the current run to finish
    ///
    /// Returns true when no entry is left to execute (a stopped queue counts
    /// as done). With `Timeout::Poll` returns false immediately if busy.
    fn wait(&mut self, timeout: Timeout) -> bool;

    /// Append a command list entry
    fn process_command_list(&mut self, list: CommandListSpan, flags: CommandListFlags);

    /// Append a display transfer entry
    fn display_transfer(&mut self, transfer: &DisplayTransfer);

    /// Append a texture copy entry
    fn texture_copy(&mut self, copy: &TextureCopy);

    /// Append a memory fill entry
    fn memory_fill(&mut self, fill: &MemoryFill);
}
