use super::*;

fn allocator() -> (SimVramAllocator, Arc<Mutex<VramState>>) {
    let state = Arc::new(Mutex::new(VramState::new()));
    (SimVramAllocator::new(state.clone()), state)
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn test_allocate_in_bank_returns_bank_addresses() {
    let (mut vram, _) = allocator();

    let a = vram.allocate_in(0x1000, VramBank::A).unwrap();
    let b = vram.allocate_in(0x1000, VramBank::B).unwrap();

    assert_eq!(a, GpuAddress(VRAM_BASE));
    assert_eq!(b, GpuAddress(VRAM_BASE + VRAM_BANK_SIZE));
    assert_eq!(vram.bank_of(a), VramBank::A);
    assert_eq!(vram.bank_of(b), VramBank::B);
}

#[test]
fn test_sizes_are_aligned() {
    let (mut vram, state) = allocator();

    let first = vram.allocate_in(10, VramBank::A).unwrap();
    let second = vram.allocate_in(10, VramBank::A).unwrap();

    assert_eq!(second.0 - first.0, VRAM_ALIGNMENT);
    assert_eq!(lock_vram(&state).used_bytes(), 2 * VRAM_ALIGNMENT);
}

#[test]
fn test_zero_and_oversized_requests_fail() {
    let (mut vram, _) = allocator();
    assert_eq!(vram.allocate_in(0, VramBank::A), None);
    assert_eq!(vram.allocate_in(VRAM_BANK_SIZE + 1, VramBank::A), None);
    assert_eq!(vram.allocate(u32::MAX), None);
}

#[test]
fn test_allocate_prefers_emptier_bank_then_falls_back() {
    let (mut vram, _) = allocator();

    vram.allocate_in(0x1000, VramBank::A).unwrap();
    let next = vram.allocate(0x1000).unwrap();
    assert_eq!(vram.bank_of(next), VramBank::B);

    // Fill bank B completely; the next allocation lands in A
    vram.allocate_in(VRAM_BANK_SIZE - 0x1000, VramBank::B).unwrap();
    let last = vram.allocate(0x1000).unwrap();
    assert_eq!(vram.bank_of(last), VramBank::A);
}

#[test]
fn test_bank_exhaustion() {
    let (mut vram, _) = allocator();
    vram.allocate_in(VRAM_BANK_SIZE, VramBank::A).unwrap();
    assert_eq!(vram.allocate_in(VRAM_ALIGNMENT, VramBank::A), None);
    assert!(vram.allocate_in(VRAM_ALIGNMENT, VramBank::B).is_some());
}

// ============================================================================
// Free
// ============================================================================

#[test]
fn test_free_coalesces_neighbours() {
    let (mut vram, state) = allocator();
    let a = vram.allocate_in(0x1000, VramBank::A).unwrap();
    let b = vram.allocate_in(0x1000, VramBank::A).unwrap();
    let c = vram.allocate_in(0x1000, VramBank::A).unwrap();

    vram.free(a);
    vram.free(c);
    vram.free(b);

    let state = lock_vram(&state);
    assert_eq!(state.live_allocations(), 0);
    assert_eq!(state.banks[0].free, vec![(VRAM_BASE, VRAM_BANK_SIZE)]);
}

#[test]
fn test_freed_block_is_reused() {
    let (mut vram, _) = allocator();
    let a = vram.allocate_in(0x2000, VramBank::A).unwrap();
    vram.allocate_in(0x1000, VramBank::A).unwrap();

    vram.free(a);
    assert_eq!(vram.allocate_in(0x1000, VramBank::A), Some(a));
}

#[test]
fn test_free_unknown_address_is_ignored() {
    let (mut vram, state) = allocator();
    vram.allocate_in(0x1000, VramBank::A).unwrap();

    vram.free(GpuAddress(VRAM_BASE + 0x80));

    assert_eq!(lock_vram(&state).live_allocations(), 1);
}

#[test]
fn test_is_device_memory() {
    let (vram, _) = allocator();
    assert!(vram.is_device_memory(GpuAddress(VRAM_BASE)));
    assert!(vram.is_device_memory(GpuAddress(VRAM_BASE + 2 * VRAM_BANK_SIZE - 1)));
    assert!(!vram.is_device_memory(GpuAddress(VRAM_BASE + 2 * VRAM_BANK_SIZE)));
    assert!(!vram.is_device_memory(GpuAddress(0x1400_0000)));
}
