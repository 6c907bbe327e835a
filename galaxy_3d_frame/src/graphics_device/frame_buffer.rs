/// Frame buffer descriptor and pixel formats
///
/// A frame buffer groups the color and optional depth buffer a render
/// target draws into. It is a plain value: it records addresses, it does
/// not own memory.

use crate::graphics_device::GpuAddress;

/// Color buffer pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    Rgba8,
    Rgb8,
    Rgba5551,
    Rgb565,
    Rgba4,
}

impl ColorFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            ColorFormat::Rgba8 => 4,
            ColorFormat::Rgb8 => 3,
            ColorFormat::Rgba5551 | ColorFormat::Rgb565 | ColorFormat::Rgba4 => 2,
        }
    }
}

/// Depth buffer pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFormat {
    Depth16,
    Depth24,
    Depth24Stencil8,
}

impl DepthFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            DepthFormat::Depth16 => 2,
            DepthFormat::Depth24 => 3,
            DepthFormat::Depth24Stencil8 => 4,
        }
    }
}

/// Size in bytes of a color buffer, `None` if it does not fit in 32 bits
pub fn color_buffer_size(width: u32, height: u32, format: ColorFormat) -> Option<u32> {
    buffer_size(width, height, format.bytes_per_pixel())
}

/// Size in bytes of a depth buffer, `None` if it does not fit in 32 bits
pub fn depth_buffer_size(width: u32, height: u32, format: DepthFormat) -> Option<u32> {
    buffer_size(width, height, format.bytes_per_pixel())
}

fn buffer_size(width: u32, height: u32, bytes_per_pixel: u32) -> Option<u32> {
    width.checked_mul(height)?.checked_mul(bytes_per_pixel)
}

/// Packed transfer-engine dimensions: height in the high half, width in the low half
pub fn buffer_dim(width: u32, height: u32) -> u32 {
    (height << 16) | (width & 0xFFFF)
}

/// Frame buffer: color and depth attachments of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
    pub color_buffer: GpuAddress,
    pub depth_format: Option<DepthFormat>,
    pub depth_buffer: Option<GpuAddress>,
}

impl FrameBuffer {
    /// Frame buffer with a color attachment only
    pub fn new(width: u32, height: u32, color_format: ColorFormat, color_buffer: GpuAddress) -> Self {
        Self {
            width,
            height,
            color_format,
            color_buffer,
            depth_format: None,
            depth_buffer: None,
        }
    }

    /// Attach a depth buffer
    pub fn with_depth(mut self, format: DepthFormat, buffer: GpuAddress) -> Self {
        self.depth_format = Some(format);
        self.depth_buffer = Some(buffer);
        self
    }

    /// Packed dimensions for a transfer from this frame buffer
    pub fn transfer_dim(&self) -> u32 {
        buffer_dim(self.width, self.height)
    }
}

#[cfg(test)]
#[path = "frame_buffer_tests.rs"]
mod tests;
