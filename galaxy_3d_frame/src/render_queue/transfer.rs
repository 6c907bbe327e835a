/// Synchronous transfer gateway
///
/// Display transfers, texture copies and memory fills share the single
/// command queue with frame rendering. Inside an open frame they are
/// queued behind the draw commands recorded so far and the call returns
/// immediately. Outside a frame the queue is drained, the operation runs
/// alone, and the call blocks until the operation's completion event.

use crate::error::Result;
use crate::graphics_device::{
    CommandListFlags, DisplayTransfer, GpuEvent, MemoryFill, TextureCopy, Timeout,
};
use super::render_queue::{RenderQueue, SOURCE};

#[derive(Debug, Clone, Copy)]
enum TransferOp<'a> {
    Display(&'a DisplayTransfer),
    TextureCopy(&'a TextureCopy),
    MemoryFill(&'a MemoryFill),
}

impl TransferOp<'_> {
    /// Event the hardware posts when this operation is done
    fn completion_event(self) -> GpuEvent {
        match self {
            TransferOp::Display(_) | TransferOp::TextureCopy(_) => GpuEvent::DisplayTransferDone,
            TransferOp::MemoryFill(_) => GpuEvent::MemoryFillDone,
        }
    }
}

impl RenderQueue {
    /// Run a display transfer, synchronously when no frame is open
    pub fn sync_display_transfer(&mut self, transfer: &DisplayTransfer) -> Result<()> {
        self.sync_transfer(TransferOp::Display(transfer))
    }

    /// Run a texture copy, synchronously when no frame is open
    pub fn sync_texture_copy(&mut self, copy: &TextureCopy) -> Result<()> {
        self.sync_transfer(TransferOp::TextureCopy(copy))
    }

    /// Run a memory fill, synchronously when no frame is open
    pub fn sync_memory_fill(&mut self, fill: &MemoryFill) -> Result<()> {
        self.sync_transfer(TransferOp::MemoryFill(fill))
    }

    fn sync_transfer(&mut self, op: TransferOp<'_>) -> Result<()> {
        if self.frame.in_frame {
            // Keep the operation behind the draws recorded so far
            self.frame_split(CommandListFlags::empty());
            self.enqueue(op);
            return Ok(());
        }

        self.wait_and_clear_queue(Timeout::Infinite);
        self.frame.in_safe_transfer = true;
        self.enqueue(op);
        self.queue.run();

        let done = op.completion_event();
        while self.wait_for_event()? != done {}
        crate::engine_trace!(SOURCE, "Safe transfer done ({:?})", done);
        Ok(())
    }

    fn enqueue(&mut self, op: TransferOp<'_>) {
        match op {
            TransferOp::Display(transfer) => self.queue.display_transfer(transfer),
            TransferOp::TextureCopy(copy) => self.queue.texture_copy(copy),
            TransferOp::MemoryFill(fill) => self.queue.memory_fill(fill),
        }
    }
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
