/// Render target lifecycle on the render queue
///
/// Creation allocates VRAM, deletion frees it. Anything that could free or
/// retarget memory still read by a queued transfer drains the queue first
/// when no frame is open.

use crate::error::{contract_violation, Error, Result};
use crate::graphics_device::{
    color_buffer_size, depth_buffer_size, ColorFormat, DepthFormat, FrameBuffer, GpuAddress,
    Screen, Side, TexFace, Texture, Timeout, VramBank,
};
use crate::target::{OutputSlot, RenderTarget, RenderTargetKey};
use super::render_queue::{RenderQueue, SOURCE};

impl RenderQueue {
    // ===== CREATION =====

    /// Create a render target backed by freshly allocated VRAM
    ///
    /// The depth buffer, if any, goes to the bank opposite the color buffer
    /// when it fits there. On failure nothing stays allocated.
    pub fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        color_format: ColorFormat,
        depth_format: Option<DepthFormat>,
    ) -> Result<RenderTargetKey> {
        check_extent(width, height)?;
        let color_size = color_buffer_size(width, height, color_format)
            .ok_or_else(|| too_large(width, height))?;
        let depth = match depth_format {
            Some(format) => Some((
                format,
                depth_buffer_size(width, height, format).ok_or_else(|| too_large(width, height))?,
            )),
            None => None,
        };

        let Some(color_buffer) = self.vram.allocate(color_size) else {
            crate::engine_warn!(SOURCE, "Out of VRAM for {}x{} color buffer", width, height);
            return Err(Error::OutOfMemory);
        };

        let mut frame_buffer = FrameBuffer::new(width, height, color_format, color_buffer);
        if let Some((format, depth_size)) = depth {
            let bank = self.vram.bank_of(color_buffer);
            match self.allocate_depth(depth_size, bank) {
                Some(depth_buffer) => frame_buffer = frame_buffer.with_depth(format, depth_buffer),
                None => {
                    self.vram.free(color_buffer);
                    crate::engine_warn!(SOURCE, "Out of VRAM for {}x{} depth buffer", width, height);
                    return Err(Error::OutOfMemory);
                }
            }
        }

        let owns_depth = frame_buffer.depth_buffer.is_some();
        let key = self.targets.insert(RenderTarget::new(frame_buffer, true, owns_depth));
        crate::engine_debug!(SOURCE, "Render target {}x{} created at {}", width, height, color_buffer);
        Ok(key)
    }

    /// Create a render target drawing into one face/level of a texture
    ///
    /// The texture keeps ownership of its memory; only the optional depth
    /// buffer belongs to the target. The texture must live in VRAM.
    pub fn create_render_target_from_texture(
        &mut self,
        texture: &Texture,
        face: TexFace,
        level: u32,
        depth_format: Option<DepthFormat>,
    ) -> Result<RenderTargetKey> {
        if !self.vram.is_device_memory(texture.data()) {
            return Err(Error::InvalidResource(format!(
                "texture data at {} is not in VRAM", texture.data()
            )));
        }

        let mut frame_buffer = texture.frame_buffer(face, level)?;
        check_extent(frame_buffer.width, frame_buffer.height)?;

        if let Some(format) = depth_format {
            let bank = self.vram.bank_of(texture.data());
            let size = depth_buffer_size(frame_buffer.width, frame_buffer.height, format)
                .ok_or_else(|| too_large(frame_buffer.width, frame_buffer.height))?;
            let Some(depth_buffer) = self.allocate_depth(size, bank) else {
                crate::engine_warn!(SOURCE, "Out of VRAM for texture render target depth buffer");
                return Err(Error::OutOfMemory);
            };
            frame_buffer = frame_buffer.with_depth(format, depth_buffer);
        }

        let owns_depth = frame_buffer.depth_buffer.is_some();
        let key = self.targets.insert(RenderTarget::new(frame_buffer, false, owns_depth));
        crate::engine_debug!(SOURCE,
            "Render target created on texture {} ({:?}, level {})", texture.data(), face, level);
        Ok(key)
    }

    /// Opposite bank first, then the same bank
    fn allocate_depth(&mut self, size: u32, color_bank: VramBank) -> Option<GpuAddress> {
        self.vram.allocate_in(size, color_bank.opposite())
            .or_else(|| self.vram.allocate_in(size, color_bank))
    }

    // ===== DELETION =====

    /// Delete a render target and free the VRAM it owns
    ///
    /// Deleting inside an open frame is a contract violation. Outside a
    /// frame the queue is drained before the memory is released.
    pub fn delete_render_target(&mut self, key: RenderTargetKey) -> Result<()> {
        if self.targets.render_target(key).is_none() {
            return Err(Error::InvalidResource("stale render target key".to_string()));
        }
        if self.frame.in_frame {
            return Err(contract_violation(
                self.config.violation_policy,
                SOURCE,
                "render target deleted inside an open frame".to_string(),
            ));
        }

        if self.targets.slot_of(key).is_some() {
            self.detach_render_target_output(key)?;
        } else {
            self.wait_and_clear_queue(Timeout::Infinite);
        }

        if let Some(target) = self.targets.remove(key) {
            self.release_vram(&target);
        }
        Ok(())
    }

    // ===== OUTPUT LINKING =====

    /// Link a render target to a screen output, or empty the output with `None`
    ///
    /// The previous occupant of the slot is unlinked. A target already
    /// linked to another slot moves to this one.
    pub fn set_render_target_output(
        &mut self,
        key: Option<RenderTargetKey>,
        screen: Screen,
        side: Side,
        transfer_flags: u32,
    ) -> Result<()> {
        if let Some(key) = key {
            if self.targets.render_target(key).is_none() {
                return Err(Error::InvalidResource("stale render target key".to_string()));
            }
        }

        let slot = OutputSlot::for_output(screen, side);
        self.unlink_slot(slot);

        let Some(key) = key else { return Ok(()) };
        if let Some(previous) = self.targets.slot_of(key) {
            self.unlink_slot(previous);
        }

        self.targets.link(slot, key);
        if let Some(target) = self.targets.render_target_mut(key) {
            target.set_output(screen, side, transfer_flags);
        }
        Ok(())
    }

    /// Unlink a render target from every output it occupies
    pub fn detach_render_target_output(&mut self, key: RenderTargetKey) -> Result<()> {
        if self.targets.render_target(key).is_none() {
            return Err(Error::InvalidResource("stale render target key".to_string()));
        }
        for slot in OutputSlot::ALL {
            if self.targets.linked_target(slot) == Some(key) {
                self.unlink_slot(slot);
            }
        }
        Ok(())
    }

    /// Empty a slot; outside a frame, drain the queue if it was occupied
    fn unlink_slot(&mut self, slot: OutputSlot) {
        if self.targets.unlink(slot).is_some() && !self.frame.in_frame {
            self.wait_and_clear_queue(Timeout::Infinite);
        }
    }

    // ===== QUERIES =====

    pub fn render_target(&self, key: RenderTargetKey) -> Option<&RenderTarget> {
        self.targets.render_target(key)
    }

    /// Keys of all live render targets, in creation order
    pub fn render_target_keys(&self) -> impl Iterator<Item = RenderTargetKey> + '_ {
        self.targets.keys()
    }

    pub fn render_target_count(&self) -> usize {
        self.targets.render_target_count()
    }

    pub fn linked_target(&self, slot: OutputSlot) -> Option<RenderTargetKey> {
        self.targets.linked_target(slot)
    }
}

fn check_extent(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > 0xFFFF || height > 0xFFFF {
        return Err(Error::InvalidResource(format!("invalid render target size {}x{}", width, height)));
    }
    Ok(())
}

fn too_large(width: u32, height: u32) -> Error {
    Error::InvalidResource(format!("render target {}x{} exceeds the addressable size", width, height))
}

#[cfg(test)]
#[path = "targets_tests.rs"]
mod tests;
