/// VRAM allocator trait and device address types

use std::fmt;

/// Physical address as seen by the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpuAddress(pub u32);

impl GpuAddress {
    /// Address `bytes` past this one
    pub fn offset(self, bytes: u32) -> Self {
        Self(self.0.wrapping_add(bytes))
    }
}

impl fmt::Display for GpuAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// One of the two VRAM banks
///
/// Color and depth buffers placed in opposite banks let the GPU fetch both
/// without contending for the same memory port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VramBank {
    A,
    B,
}

impl VramBank {
    /// The other bank
    pub fn opposite(self) -> Self {
        match self {
            VramBank::A => VramBank::B,
            VramBank::B => VramBank::A,
        }
    }
}

/// VRAM allocator
///
/// Allocations are identified by their start address. The allocator is the
/// only owner of the free space; render targets only record which addresses
/// they are responsible for freeing.
pub trait VramAllocator: Send {
    /// Allocate `size` bytes in any bank
    fn allocate(&mut self, size: u32) -> Option<GpuAddress>;

    /// Allocate `size` bytes in the given bank only
    fn allocate_in(&mut self, size: u32, bank: VramBank) -> Option<GpuAddress>;

    /// Release an allocation previously returned by `allocate`/`allocate_in`
    fn free(&mut self, address: GpuAddress);

    /// Bank an address lies in (only meaningful for device memory)
    fn bank_of(&self, address: GpuAddress) -> VramBank;

    /// Whether the address lies in VRAM at all
    fn is_device_memory(&self, address: GpuAddress) -> bool;
}
