/// Texture descriptor used to render into a texture's own memory
///
/// The texture owns its backing memory; render targets created from a
/// texture only point at one of its sub-images (face + mip level).

use crate::error::{Error, Result};
use crate::graphics_device::{color_buffer_size, ColorFormat, FrameBuffer, GpuAddress};

/// Texture face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexFace {
    /// The only face of a 2D texture
    Texture2D,
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl TexFace {
    fn cube_index(self) -> Option<usize> {
        match self {
            TexFace::Texture2D => None,
            TexFace::PositiveX => Some(0),
            TexFace::NegativeX => Some(1),
            TexFace::PositiveY => Some(2),
            TexFace::NegativeY => Some(3),
            TexFace::PositiveZ => Some(4),
            TexFace::NegativeZ => Some(5),
        }
    }
}

/// Backing memory of a texture, one block per face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStorage {
    Flat(GpuAddress),
    Cube([GpuAddress; 6]),
}

/// Texture (owned elsewhere; described here by its memory layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
    /// Highest mip level present (0 = base level only)
    pub max_level: u32,
    pub storage: TextureStorage,
}

impl Texture {
    /// 2D texture with a single base level
    pub fn new_2d(width: u32, height: u32, format: ColorFormat, data: GpuAddress) -> Self {
        Self {
            width,
            height,
            format,
            max_level: 0,
            storage: TextureStorage::Flat(data),
        }
    }

    /// Start of the texture's memory (first face)
    pub fn data(&self) -> GpuAddress {
        match self.storage {
            TextureStorage::Flat(address) => address,
            TextureStorage::Cube(faces) => faces[0],
        }
    }

    /// Base address of one face
    pub fn face_data(&self, face: TexFace) -> Result<GpuAddress> {
        match (self.storage, face.cube_index()) {
            (TextureStorage::Flat(address), None) => Ok(address),
            (TextureStorage::Cube(faces), Some(index)) => Ok(faces[index]),
            (TextureStorage::Flat(_), Some(_)) => Err(Error::InvalidResource(
                format!("face {:?} requested from a 2D texture", face),
            )),
            (TextureStorage::Cube(_), None) => Err(Error::InvalidResource(
                "2D face requested from a cube texture".to_string(),
            )),
        }
    }

    /// Byte offset of a mip level from the start of its face
    ///
    /// Each level is a quarter of the previous one. `None` if the offset
    /// does not fit in 32 bits.
    pub fn level_offset(&self, level: u32) -> Option<u32> {
        let base = color_buffer_size(self.width, self.height, self.format)?;
        (0..level)
            .map(|k| k.checked_mul(2).and_then(|shift| base.checked_shr(shift)).unwrap_or(0))
            .take_while(|&size| size > 0)
            .try_fold(0u32, |offset, size| offset.checked_add(size))
    }

    /// Frame buffer covering one face at one mip level
    pub fn frame_buffer(&self, face: TexFace, level: u32) -> Result<FrameBuffer> {
        if level > self.max_level {
            return Err(Error::InvalidResource(format!(
                "mip level {} out of range (max_level = {})", level, self.max_level
            )));
        }
        let offset = self.level_offset(level).ok_or_else(|| Error::InvalidResource(format!(
            "{}x{} texture too large to address level {}", self.width, self.height, level
        )))?;
        let address = self.face_data(face)?.offset(offset);
        Ok(FrameBuffer::new(
            self.width.checked_shr(level).unwrap_or(0).max(1),
            self.height.checked_shr(level).unwrap_or(0).max(1),
            self.format,
            address,
        ))
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
