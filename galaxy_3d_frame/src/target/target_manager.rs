/// Render target registry.
///
/// Owns every live render target in an arena addressed by stable keys,
/// keeps their creation order, and tracks the three output slots. The
/// manager is pure bookkeeping: VRAM and queue synchronization are handled
/// by `RenderQueue`, which wraps these operations.

use slotmap::SlotMap;
use super::render_target::{OutputSlot, RenderTarget, RenderTargetKey};

/// Target registry (owned by RenderQueue)
pub struct TargetManager {
    render_targets: SlotMap<RenderTargetKey, RenderTarget>,
    /// Keys in creation order
    order: Vec<RenderTargetKey>,
    /// Output slots, indexed by OutputSlot
    linked: [Option<RenderTargetKey>; 3],
}

impl TargetManager {
    /// Create a new empty target manager
    pub fn new() -> Self {
        Self {
            render_targets: SlotMap::with_key(),
            order: Vec::new(),
            linked: [None; 3],
        }
    }

    /// Register a target at the end of the creation order
    pub(crate) fn insert(&mut self, target: RenderTarget) -> RenderTargetKey {
        let key = self.render_targets.insert(target);
        self.order.push(key);
        key
    }

    /// Unregister a target
    ///
    /// Returns the removed target, or None if the key is stale. Any slot
    /// still pointing at the target is cleared.
    pub(crate) fn remove(&mut self, key: RenderTargetKey) -> Option<RenderTarget> {
        let target = self.render_targets.remove(key)?;
        self.order.retain(|k| *k != key);
        for slot in self.linked.iter_mut() {
            if *slot == Some(key) {
                *slot = None;
            }
        }
        Some(target)
    }

    /// Get a render target by key
    pub fn render_target(&self, key: RenderTargetKey) -> Option<&RenderTarget> {
        self.render_targets.get(key)
    }

    pub(crate) fn render_target_mut(&mut self, key: RenderTargetKey) -> Option<&mut RenderTarget> {
        self.render_targets.get_mut(key)
    }

    /// Keys of all live targets, in creation order
    pub fn keys(&self) -> impl Iterator<Item = RenderTargetKey> + '_ {
        self.order.iter().copied()
    }

    /// Number of live targets
    pub fn render_target_count(&self) -> usize {
        self.render_targets.len()
    }

    /// Target currently linked to a slot
    pub fn linked_target(&self, slot: OutputSlot) -> Option<RenderTargetKey> {
        self.linked[slot.index()]
    }

    /// Slot a target is linked to, if any
    pub fn slot_of(&self, key: RenderTargetKey) -> Option<OutputSlot> {
        OutputSlot::ALL
            .into_iter()
            .find(|slot| self.linked[slot.index()] == Some(key))
    }

    /// Put a target into an empty slot
    pub(crate) fn link(&mut self, slot: OutputSlot, key: RenderTargetKey) {
        debug_assert!(self.linked[slot.index()].is_none(), "slot {:?} is occupied", slot);
        if let Some(target) = self.render_targets.get_mut(key) {
            target.set_linked(true);
            self.linked[slot.index()] = Some(key);
        }
    }

    /// Empty a slot, clearing the linked flag of its previous occupant
    pub(crate) fn unlink(&mut self, slot: OutputSlot) -> Option<RenderTargetKey> {
        let key = self.linked[slot.index()].take()?;
        if let Some(target) = self.render_targets.get_mut(key) {
            target.set_linked(false);
        }
        Some(key)
    }

    /// Empty every slot
    pub(crate) fn clear_links(&mut self) {
        for slot in OutputSlot::ALL {
            self.unlink(slot);
        }
    }

    /// Unregister every target, returning them in creation order
    pub(crate) fn take_all(&mut self) -> Vec<RenderTarget> {
        self.linked = [None; 3];
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|key| self.render_targets.remove(key))
            .collect()
    }
}

impl Default for TargetManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "target_manager_tests.rs"]
mod tests;
