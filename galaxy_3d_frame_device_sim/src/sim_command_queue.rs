/// Simulated command queue - a worker thread executing entries in order
///
/// Entries are appended under a mutex; the worker picks them up while the
/// queue runs, spends the configured latency on each, then posts the
/// completion events. For the last entry of a run, `QueueFinished` is
/// posted before the entry's own event, and both are posted before the
/// queue reports done to `wait`.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use galaxy_3d_frame::galaxy3d::{Error, Result};
use galaxy_3d_frame::galaxy3d::device::{
    CommandListFlags, CommandListSpan, CommandQueue, DisplayTransfer, EventSender, GpuEvent,
    MemoryFill, TextureCopy, Timeout,
};
use crate::debug::SimStatsTracker;

const SOURCE: &str = "galaxy3d::sim::CommandQueue";

#[derive(Debug, Clone)]
enum SimEntry {
    CommandList(CommandListSpan, CommandListFlags),
    DisplayTransfer(DisplayTransfer),
    TextureCopy(TextureCopy),
    MemoryFill(MemoryFill),
}

impl SimEntry {
    fn completion_event(&self) -> Option<GpuEvent> {
        match self {
            SimEntry::CommandList(..) => None,
            SimEntry::DisplayTransfer(_) | SimEntry::TextureCopy(_) => Some(GpuEvent::DisplayTransferDone),
            SimEntry::MemoryFill(_) => Some(GpuEvent::MemoryFillDone),
        }
    }

    fn record(&self, stats: &SimStatsTracker) {
        match self {
            SimEntry::CommandList(span, _) => stats.increment_command_list(span.size_words),
            SimEntry::DisplayTransfer(_) => stats.increment_display_transfer(),
            SimEntry::TextureCopy(_) => stats.increment_texture_copy(),
            SimEntry::MemoryFill(_) => stats.increment_memory_fill(),
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    entries: Vec<SimEntry>,
    /// Index of the next entry to execute
    next: usize,
    running: bool,
    /// An entry is executing on the worker
    busy: bool,
    /// Bumped by `clear`, so an entry cleared while executing posts nothing
    generation: u64,
    notify: Option<EventSender>,
    shutdown: bool,
}

impl QueueState {
    fn has_work(&self) -> bool {
        self.running && self.next < self.entries.len()
    }

    fn is_done(&self) -> bool {
        !self.busy && !self.has_work()
    }
}

#[derive(Debug, Default)]
struct QueueShared {
    state: Mutex<QueueState>,
    /// Signalled when there may be work (or on shutdown)
    wake: Condvar,
    /// Signalled when an entry finished
    idle: Condvar,
}

impl QueueShared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Simulated command queue
pub struct SimCommandQueue {
    shared: Arc<QueueShared>,
    worker: Option<JoinHandle<()>>,
}

impl SimCommandQueue {
    pub(crate) fn new(entry_latency: Duration, stats: Arc<SimStatsTracker>) -> Result<Self> {
        let shared = Arc::new(QueueShared::default());
        let worker_shared = shared.clone();
        let worker = thread::Builder::new()
            .name("sim-command-queue".to_string())
            .spawn(move || worker_loop(worker_shared, entry_latency, stats))
            .map_err(|e| Error::InitializationFailed(format!("command queue worker: {}", e)))?;

        Ok(Self { shared, worker: Some(worker) })
    }

    fn push(&mut self, entry: SimEntry) {
        self.shared.lock().entries.push(entry);
        self.shared.wake.notify_all();
    }
}

fn worker_loop(shared: Arc<QueueShared>, latency: Duration, stats: Arc<SimStatsTracker>) {
    loop {
        let (entry, generation) = {
            let mut state = shared.lock();
            while !state.shutdown && !state.has_work() {
                state = shared.wake.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
            if state.shutdown {
                return;
            }
            let entry = state.entries[state.next].clone();
            state.next += 1;
            state.busy = true;
            (entry, state.generation)
        };

        if !latency.is_zero() {
            thread::sleep(latency);
        }
        entry.record(&stats);

        let mut state = shared.lock();
        state.busy = false;
        if state.generation == generation {
            let last = state.next == state.entries.len();
            if last {
                stats.increment_queue_run();
            }
            if let Some(notify) = &state.notify {
                if last {
                    let _ = notify.send(GpuEvent::QueueFinished);
                }
                if let Some(event) = entry.completion_event() {
                    let _ = notify.send(event);
                }
            }
        }
        shared.idle.notify_all();
    }
}

impl CommandQueue for SimCommandQueue {
    fn bind(&mut self, notify: Option<EventSender>) {
        let bound = notify.is_some();
        self.shared.lock().notify = notify;
        galaxy_3d_frame::engine_debug!(SOURCE, "Queue {}", if bound { "bound" } else { "unbound" });
    }

    fn run(&mut self) {
        self.shared.lock().running = true;
        self.shared.wake.notify_all();
    }

    fn stop(&mut self) {
        self.shared.lock().running = false;
    }

    fn clear(&mut self) {
        let mut state = self.shared.lock();
        if state.running {
            galaxy_3d_frame::engine_warn!(SOURCE, "Clearing a running queue");
        }
        state.entries.clear();
        state.next = 0;
        state.generation += 1;
    }

    fn wait(&mut self, timeout: Timeout) -> bool {
        let mut state = self.shared.lock();
        match timeout {
            Timeout::Poll => state.is_done(),
            Timeout::Infinite => {
                while !state.is_done() {
                    state = self.shared.idle.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
                true
            }
        }
    }

    fn process_command_list(&mut self, list: CommandListSpan, flags: CommandListFlags) {
        self.push(SimEntry::CommandList(list, flags));
    }

    fn display_transfer(&mut self, transfer: &DisplayTransfer) {
        self.push(SimEntry::DisplayTransfer(*transfer));
    }

    fn texture_copy(&mut self, copy: &TextureCopy) {
        self.push(SimEntry::TextureCopy(*copy));
    }

    fn memory_fill(&mut self, fill: &MemoryFill) {
        self.push(SimEntry::MemoryFill(*fill));
    }
}

impl Drop for SimCommandQueue {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                galaxy_3d_frame::engine_error!(SOURCE, "Command queue worker panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "sim_command_queue_tests.rs"]
mod tests;
