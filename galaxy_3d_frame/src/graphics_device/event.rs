/// Hardware event channel
///
/// Vblank interrupts and command-queue completion are producers of discrete
/// `GpuEvent` messages. The render queue owns the receiving half and
/// dispatches every event into its state machine, so blocking waits are a
/// receive on this channel rather than an OS wait primitive.

use std::sync::mpsc::{self, Receiver, SendError, Sender};
use crate::graphics_device::Screen;

/// A discrete hardware signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuEvent {
    /// Vertical blank of one physical display
    VBlank(Screen),

    /// The command queue finished the last entry of its current run
    QueueFinished,

    /// The transfer engine finished a display transfer or a texture copy
    DisplayTransferDone,

    /// The fill engine finished a memory fill
    MemoryFillDone,
}

/// Sending half of the event channel, cloned into every producer
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<GpuEvent>,
}

impl EventSender {
    /// Post an event
    ///
    /// Fails only when the render queue (the receiver) is gone.
    pub fn send(&self, event: GpuEvent) -> Result<(), SendError<GpuEvent>> {
        self.sender.send(event)
    }
}

/// Create a new event channel
pub fn event_channel() -> (EventSender, Receiver<GpuEvent>) {
    let (sender, receiver) = mpsc::channel();
    (EventSender { sender }, receiver)
}
