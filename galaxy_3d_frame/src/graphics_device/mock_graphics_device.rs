/// Mock graphics device for unit tests (no GPU required)
///
/// Every mock records its calls as strings in a shared log so tests can
/// assert on the exact sequence of queue and device operations. Queue runs
/// complete synchronously inside `run()` unless auto-completion is turned
/// off, in which case the queue stays busy until `complete_pending()` or an
/// infinite `wait()`.

use std::sync::{Arc, Mutex};
use crate::graphics_device::{
    CommandListFlags, CommandListSpan, CommandQueue, DisplayTransfer, EventSender, FrameBuffer,
    GpuAddress, GpuEvent, GraphicsDevice, MemoryFill, Screen, Side, TextureCopy, TickCounter,
    Timeout, VramAllocator, VramBank, Viewport,
};

/// Shared, ordered call log
pub type CallLog = Arc<Mutex<Vec<String>>>;

const BANK_A_BASE: u32 = 0x1800_0000;
const BANK_B_BASE: u32 = 0x1830_0000;
const BANK_SIZE: u32 = 0x0030_0000;
const LINEAR_BASE: u32 = 0x1400_0000;

// ============================================================================
// Mock CommandQueue
// ============================================================================

/// Entry kept by the mock queue
#[derive(Debug, Clone, PartialEq)]
pub enum MockEntry {
    CommandList(CommandListSpan, CommandListFlags),
    DisplayTransfer(DisplayTransfer),
    TextureCopy(TextureCopy),
    MemoryFill(MemoryFill),
}

impl MockEntry {
    fn completion_event(&self) -> Option<GpuEvent> {
        match self {
            MockEntry::CommandList(..) => None,
            MockEntry::DisplayTransfer(_) | MockEntry::TextureCopy(_) => Some(GpuEvent::DisplayTransferDone),
            MockEntry::MemoryFill(_) => Some(GpuEvent::MemoryFillDone),
        }
    }
}

#[derive(Debug, Default)]
struct MockQueueState {
    notify: Option<EventSender>,
    running: bool,
    auto_complete: bool,
    entries: Vec<MockEntry>,
    executed: usize,
    /// Every entry ever executed, in order
    history: Vec<MockEntry>,
}

impl MockQueueState {
    fn is_done(&self) -> bool {
        !self.running || self.executed == self.entries.len()
    }

    fn execute_pending(&mut self) {
        if !self.running {
            return;
        }
        let count = self.entries.len();
        while self.executed < count {
            let entry = self.entries[self.executed].clone();
            self.executed += 1;
            if let Some(notify) = &self.notify {
                if self.executed == count {
                    let _ = notify.send(GpuEvent::QueueFinished);
                }
                if let Some(event) = entry.completion_event() {
                    let _ = notify.send(event);
                }
            }
            self.history.push(entry);
        }
    }
}

/// Mock command queue
pub struct MockCommandQueue {
    state: Arc<Mutex<MockQueueState>>,
    calls: CallLog,
}

impl CommandQueue for MockCommandQueue {
    fn bind(&mut self, notify: Option<EventSender>) {
        let bound = notify.is_some();
        self.state.lock().unwrap().notify = notify;
        self.calls.lock().unwrap().push(format!("queue.bind {}", bound));
    }

    fn run(&mut self) {
        self.calls.lock().unwrap().push("queue.run".to_string());
        let mut state = self.state.lock().unwrap();
        state.running = true;
        if state.auto_complete {
            state.execute_pending();
        }
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push("queue.stop".to_string());
        self.state.lock().unwrap().running = false;
    }

    fn clear(&mut self) {
        self.calls.lock().unwrap().push("queue.clear".to_string());
        let mut state = self.state.lock().unwrap();
        state.entries.clear();
        state.executed = 0;
    }

    fn wait(&mut self, timeout: Timeout) -> bool {
        self.calls.lock().unwrap().push(format!("queue.wait {:?}", timeout));
        let mut state = self.state.lock().unwrap();
        if state.is_done() {
            return true;
        }
        match timeout {
            Timeout::Poll => false,
            Timeout::Infinite => {
                state.execute_pending();
                true
            }
        }
    }

    fn process_command_list(&mut self, list: CommandListSpan, flags: CommandListFlags) {
        self.calls.lock().unwrap().push(format!("queue.command_list {}", list.size_words));
        self.state.lock().unwrap().entries.push(MockEntry::CommandList(list, flags));
    }

    fn display_transfer(&mut self, transfer: &DisplayTransfer) {
        self.calls.lock().unwrap().push(format!("queue.display_transfer {}", transfer.output));
        self.state.lock().unwrap().entries.push(MockEntry::DisplayTransfer(*transfer));
    }

    fn texture_copy(&mut self, copy: &TextureCopy) {
        self.calls.lock().unwrap().push("queue.texture_copy".to_string());
        self.state.lock().unwrap().entries.push(MockEntry::TextureCopy(*copy));
    }

    fn memory_fill(&mut self, fill: &MemoryFill) {
        self.calls.lock().unwrap().push("queue.memory_fill".to_string());
        self.state.lock().unwrap().entries.push(MockEntry::MemoryFill(*fill));
    }
}

// ============================================================================
// Mock VramAllocator
// ============================================================================

#[derive(Debug)]
struct MockVramState {
    next: [u32; 2],
    capacity: [u32; 2],
    used: [u32; 2],
    live: Vec<(GpuAddress, u32)>,
}

fn bank_index(bank: VramBank) -> usize {
    match bank {
        VramBank::A => 0,
        VramBank::B => 1,
    }
}

/// Mock VRAM allocator: bump allocation per bank with a capacity limit
pub struct MockVramAllocator {
    state: Arc<Mutex<MockVramState>>,
    calls: CallLog,
}

impl VramAllocator for MockVramAllocator {
    fn allocate(&mut self, size: u32) -> Option<GpuAddress> {
        self.allocate_in(size, VramBank::A)
            .or_else(|| self.allocate_in(size, VramBank::B))
    }

    fn allocate_in(&mut self, size: u32, bank: VramBank) -> Option<GpuAddress> {
        let mut state = self.state.lock().unwrap();
        let i = bank_index(bank);
        if state.used[i] + size > state.capacity[i] {
            return None;
        }
        let address = GpuAddress(state.next[i]);
        state.next[i] += size;
        state.used[i] += size;
        state.live.push((address, size));
        self.calls.lock().unwrap().push(format!("vram.alloc {:?} {}", bank, size));
        Some(address)
    }

    fn free(&mut self, address: GpuAddress) {
        let bank = self.bank_of(address);
        let mut state = self.state.lock().unwrap();
        if let Some(pos) = state.live.iter().position(|(a, _)| *a == address) {
            let (_, size) = state.live.remove(pos);
            state.used[bank_index(bank)] -= size;
        }
        self.calls.lock().unwrap().push(format!("vram.free {}", address));
    }

    fn bank_of(&self, address: GpuAddress) -> VramBank {
        if address.0 >= BANK_B_BASE { VramBank::B } else { VramBank::A }
    }

    fn is_device_memory(&self, address: GpuAddress) -> bool {
        address.0 >= BANK_A_BASE && address.0 < BANK_B_BASE + BANK_SIZE
    }
}

// ============================================================================
// Mock GraphicsDevice + TickCounter
// ============================================================================

#[derive(Default)]
struct MockDeviceState {
    recorded_words: u32,
    split_start: u32,
    vblank: [Option<EventSender>; 2],
    bound_frame_buffer: Option<FrameBuffer>,
    viewport: Option<Viewport>,
}

/// Mock GPU context
pub struct MockGraphicsDevice {
    state: Arc<Mutex<MockDeviceState>>,
    calls: CallLog,
}

impl GraphicsDevice for MockGraphicsDevice {
    fn reset_command_buffer(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.recorded_words = 0;
        state.split_start = 0;
        self.calls.lock().unwrap().push("device.reset_command_buffer".to_string());
    }

    fn detach_command_buffer(&mut self) {
        self.calls.lock().unwrap().push("device.detach_command_buffer".to_string());
    }

    fn split_command_list(&mut self) -> Option<CommandListSpan> {
        let mut state = self.state.lock().unwrap();
        let size_words = state.recorded_words - state.split_start;
        if size_words == 0 {
            return None;
        }
        let span = CommandListSpan {
            address: GpuAddress(LINEAR_BASE + state.split_start * 4),
            size_words,
        };
        state.split_start = state.recorded_words;
        Some(span)
    }

    fn set_frame_buffer(&mut self, frame_buffer: &FrameBuffer) {
        self.state.lock().unwrap().bound_frame_buffer = Some(*frame_buffer);
        self.calls.lock().unwrap().push(format!(
            "device.set_frame_buffer {}x{}", frame_buffer.width, frame_buffer.height
        ));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.state.lock().unwrap().viewport = Some(viewport);
        self.calls.lock().unwrap().push(format!(
            "device.set_viewport {} {} {} {}", viewport.x, viewport.y, viewport.width, viewport.height
        ));
    }

    fn flush_linear_heap(&mut self) {
        self.calls.lock().unwrap().push("device.flush_linear_heap".to_string());
    }

    fn screen_frame_buffer(&self, screen: Screen, side: Side) -> GpuAddress {
        match (screen, side) {
            (Screen::Top, Side::Left) => GpuAddress(0x1F00_0000),
            (Screen::Top, Side::Right) => GpuAddress(0x1F05_0000),
            (Screen::Bottom, _) => GpuAddress(0x1F10_0000),
        }
    }

    fn swap_buffers(&mut self, screen: Screen, stereo: bool) {
        self.calls.lock().unwrap().push(format!("device.swap {:?} stereo={}", screen, stereo));
    }

    fn set_vblank_notify(&mut self, screen: Screen, notify: Option<EventSender>) {
        let bound = notify.is_some();
        self.state.lock().unwrap().vblank[screen.index()] = notify;
        self.calls.lock().unwrap().push(format!("device.vblank {:?} {}", screen, bound));
    }

    fn create_tick_counter(&self) -> Box<dyn TickCounter> {
        Box::new(MockTickCounter { running: false, latched: 0.0, updates: 0 })
    }
}

/// Mock tick counter: every `update` after a `start` latches one more millisecond
pub struct MockTickCounter {
    running: bool,
    latched: f32,
    updates: u32,
}

impl TickCounter for MockTickCounter {
    fn start(&mut self) {
        self.running = true;
    }

    fn update(&mut self) {
        if self.running {
            self.updates += 1;
            self.latched = self.updates as f32;
        }
    }

    fn read(&self) -> f32 {
        self.latched
    }
}

// ============================================================================
// MockGpu - handles shared with the boxed mocks
// ============================================================================

/// Test-side handle to the mocks moved into a render queue
#[derive(Clone)]
pub struct MockGpu {
    calls: CallLog,
    queue: Arc<Mutex<MockQueueState>>,
    vram: Arc<Mutex<MockVramState>>,
    device: Arc<Mutex<MockDeviceState>>,
}

impl MockGpu {
    /// Create the mocks; returns the handle plus the boxed collaborators
    pub fn new() -> (
        Self,
        Box<dyn GraphicsDevice>,
        Box<dyn CommandQueue>,
        Box<dyn VramAllocator>,
    ) {
        let gpu = Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(MockQueueState { auto_complete: true, ..Default::default() })),
            vram: Arc::new(Mutex::new(MockVramState {
                next: [BANK_A_BASE, BANK_B_BASE],
                capacity: [BANK_SIZE, BANK_SIZE],
                used: [0, 0],
                live: Vec::new(),
            })),
            device: Arc::new(Mutex::new(MockDeviceState::default())),
        };
        let device = Box::new(MockGraphicsDevice { state: gpu.device.clone(), calls: gpu.calls.clone() });
        let queue = Box::new(MockCommandQueue { state: gpu.queue.clone(), calls: gpu.calls.clone() });
        let vram = Box::new(MockVramAllocator { state: gpu.vram.clone(), calls: gpu.calls.clone() });
        (gpu, device, queue, vram)
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Keep queue runs busy until `complete_pending` (false) or finish them in `run` (true)
    pub fn set_auto_complete(&self, auto_complete: bool) {
        self.queue.lock().unwrap().auto_complete = auto_complete;
    }

    /// Finish every pending entry of a running queue
    pub fn complete_pending(&self) {
        self.queue.lock().unwrap().execute_pending();
    }

    /// Entries executed so far, in order
    pub fn executed(&self) -> Vec<MockEntry> {
        self.queue.lock().unwrap().history.clone()
    }

    /// Entries waiting in the queue
    pub fn pending_entries(&self) -> Vec<MockEntry> {
        let state = self.queue.lock().unwrap();
        state.entries[state.executed..].to_vec()
    }

    /// Simulate draw commands recorded into the command buffer
    pub fn record_commands(&self, words: u32) {
        self.device.lock().unwrap().recorded_words += words;
    }

    /// Frame buffer bound last
    pub fn bound_frame_buffer(&self) -> Option<FrameBuffer> {
        self.device.lock().unwrap().bound_frame_buffer
    }

    /// Viewport set last
    pub fn viewport(&self) -> Option<Viewport> {
        self.device.lock().unwrap().viewport
    }

    /// Raise a vblank interrupt; returns false if the screen has no sink
    pub fn fire_vblank(&self, screen: Screen) -> bool {
        let state = self.device.lock().unwrap();
        match &state.vblank[screen.index()] {
            Some(sink) => sink.send(GpuEvent::VBlank(screen)).is_ok(),
            None => false,
        }
    }

    /// Post an arbitrary event through the queue's sink
    pub fn post(&self, event: GpuEvent) -> bool {
        match &self.queue.lock().unwrap().notify {
            Some(sink) => sink.send(event).is_ok(),
            None => false,
        }
    }

    /// Limit the free space of a VRAM bank
    pub fn set_bank_capacity(&self, bank: VramBank, bytes: u32) {
        self.vram.lock().unwrap().capacity[bank_index(bank)] = bytes;
    }

    /// Live VRAM allocations
    pub fn live_allocations(&self) -> Vec<(GpuAddress, u32)> {
        self.vram.lock().unwrap().live.clone()
    }
}
