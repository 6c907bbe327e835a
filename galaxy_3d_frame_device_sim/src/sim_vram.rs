/// Simulated two-bank VRAM allocator
///
/// Each bank keeps an address-sorted free list; allocation is first-fit
/// with 128-byte alignment and freed blocks are merged with their
/// neighbours.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use rustc_hash::FxHashMap;
use galaxy_3d_frame::galaxy3d::device::{GpuAddress, VramAllocator, VramBank};

const SOURCE: &str = "galaxy3d::sim::Vram";

/// Start of VRAM (bank A)
pub const VRAM_BASE: u32 = 0x1800_0000;
/// Size of one VRAM bank
pub const VRAM_BANK_SIZE: u32 = 0x0030_0000;
/// Allocation granularity
pub const VRAM_ALIGNMENT: u32 = 0x80;

fn bank_index(bank: VramBank) -> usize {
    match bank {
        VramBank::A => 0,
        VramBank::B => 1,
    }
}

#[derive(Debug)]
struct Bank {
    /// Free blocks as (address, size), sorted by address
    free: Vec<(u32, u32)>,
}

impl Bank {
    fn new(base: u32) -> Self {
        Self { free: vec![(base, VRAM_BANK_SIZE)] }
    }

    fn allocate(&mut self, size: u32) -> Option<u32> {
        let index = self.free.iter().position(|&(_, free)| free >= size)?;
        let (address, free) = self.free[index];
        if free == size {
            self.free.remove(index);
        } else {
            self.free[index] = (address + size, free - size);
        }
        Some(address)
    }

    fn release(&mut self, address: u32, size: u32) {
        let index = self.free.partition_point(|&(a, _)| a < address);
        self.free.insert(index, (address, size));

        // Merge with the next block, then with the previous one
        if index + 1 < self.free.len() {
            let (next_address, next_size) = self.free[index + 1];
            if address + size == next_address {
                self.free[index].1 += next_size;
                self.free.remove(index + 1);
            }
        }
        if index > 0 {
            let (prev_address, prev_size) = self.free[index - 1];
            if prev_address + prev_size == address {
                self.free[index - 1].1 += self.free[index].1;
                self.free.remove(index);
            }
        }
    }

    fn free_bytes(&self) -> u32 {
        self.free.iter().map(|&(_, size)| size).sum()
    }
}

#[derive(Debug)]
pub(crate) struct VramState {
    banks: [Bank; 2],
    allocations: FxHashMap<GpuAddress, u32>,
}

impl VramState {
    pub(crate) fn new() -> Self {
        Self {
            banks: [Bank::new(VRAM_BASE), Bank::new(VRAM_BASE + VRAM_BANK_SIZE)],
            allocations: FxHashMap::default(),
        }
    }

    pub(crate) fn live_allocations(&self) -> usize {
        self.allocations.len()
    }

    pub(crate) fn used_bytes(&self) -> u32 {
        self.allocations.values().sum()
    }

    pub(crate) fn free_bytes(&self, bank: VramBank) -> u32 {
        self.banks[bank_index(bank)].free_bytes()
    }
}

pub(crate) fn lock_vram(state: &Mutex<VramState>) -> MutexGuard<'_, VramState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated VRAM allocator
pub struct SimVramAllocator {
    state: Arc<Mutex<VramState>>,
}

impl SimVramAllocator {
    pub(crate) fn new(state: Arc<Mutex<VramState>>) -> Self {
        Self { state }
    }
}

impl VramAllocator for SimVramAllocator {
    fn allocate(&mut self, size: u32) -> Option<GpuAddress> {
        // Prefer the bank with more room left
        let (free_a, free_b) = {
            let state = lock_vram(&self.state);
            (state.free_bytes(VramBank::A), state.free_bytes(VramBank::B))
        };
        let first = if free_b > free_a { VramBank::B } else { VramBank::A };
        self.allocate_in(size, first)
            .or_else(|| self.allocate_in(size, first.opposite()))
    }

    fn allocate_in(&mut self, size: u32, bank: VramBank) -> Option<GpuAddress> {
        if size == 0 {
            return None;
        }
        let size = size.checked_next_multiple_of(VRAM_ALIGNMENT)?;

        let mut state = lock_vram(&self.state);
        let address = GpuAddress(state.banks[bank_index(bank)].allocate(size)?);
        state.allocations.insert(address, size);
        galaxy_3d_frame::engine_trace!(SOURCE, "Allocated {} bytes at {} (bank {:?})", size, address, bank);
        Some(address)
    }

    fn free(&mut self, address: GpuAddress) {
        let bank = self.bank_of(address);
        let mut state = lock_vram(&self.state);
        match state.allocations.remove(&address) {
            Some(size) => state.banks[bank_index(bank)].release(address.0, size),
            None => galaxy_3d_frame::engine_warn!(SOURCE, "Free of unknown VRAM address {}", address),
        }
    }

    fn bank_of(&self, address: GpuAddress) -> VramBank {
        if address.0 >= VRAM_BASE + VRAM_BANK_SIZE { VramBank::B } else { VramBank::A }
    }

    fn is_device_memory(&self, address: GpuAddress) -> bool {
        address.0 >= VRAM_BASE && address.0 < VRAM_BASE + 2 * VRAM_BANK_SIZE
    }
}

#[cfg(test)]
#[path = "sim_vram_tests.rs"]
mod tests;
