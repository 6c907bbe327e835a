use super::*;

// ============================================================================
// Buffer size tests
// ============================================================================

#[test]
fn test_color_buffer_size_per_format() {
    assert_eq!(color_buffer_size(256, 256, ColorFormat::Rgba8), Some(256 * 256 * 4));
    assert_eq!(color_buffer_size(256, 256, ColorFormat::Rgb8), Some(256 * 256 * 3));
    assert_eq!(color_buffer_size(400, 240, ColorFormat::Rgb565), Some(400 * 240 * 2));
    assert_eq!(color_buffer_size(8, 8, ColorFormat::Rgba5551), Some(128));
    assert_eq!(color_buffer_size(8, 8, ColorFormat::Rgba4), Some(128));
}

#[test]
fn test_depth_buffer_size_per_format() {
    assert_eq!(depth_buffer_size(16, 16, DepthFormat::Depth16), Some(512));
    assert_eq!(depth_buffer_size(16, 16, DepthFormat::Depth24), Some(768));
    assert_eq!(depth_buffer_size(16, 16, DepthFormat::Depth24Stencil8), Some(1024));
}

#[test]
fn test_buffer_size_overflow_is_none() {
    assert_eq!(color_buffer_size(0x8000, 0x8000, ColorFormat::Rgba8), None);
    assert_eq!(color_buffer_size(0xFFFF, 0xFFFF, ColorFormat::Rgb565), None);
    assert_eq!(depth_buffer_size(0x8001, 0x8000, DepthFormat::Depth24Stencil8), None);
    assert!(color_buffer_size(0xFFFF, 0xFFFF, ColorFormat::Rgba4).is_none());
    assert_eq!(color_buffer_size(1024, 1024, ColorFormat::Rgba8), Some(0x40_0000));
}

#[test]
fn test_buffer_dim_packs_height_high() {
    assert_eq!(buffer_dim(400, 240), (240 << 16) | 400);
    assert_eq!(buffer_dim(0x1_0010, 1), (1 << 16) | 0x10);
}

// ============================================================================
// FrameBuffer tests
// ============================================================================

#[test]
fn test_frame_buffer_color_only() {
    let fb = FrameBuffer::new(320, 240, ColorFormat::Rgba8, GpuAddress(0x1800_0000));
    assert_eq!(fb.depth_format, None);
    assert_eq!(fb.depth_buffer, None);
    assert_eq!(fb.transfer_dim(), buffer_dim(320, 240));
}

#[test]
fn test_frame_buffer_with_depth() {
    let fb = FrameBuffer::new(320, 240, ColorFormat::Rgba8, GpuAddress(0x1800_0000))
        .with_depth(DepthFormat::Depth24Stencil8, GpuAddress(0x1830_0000));
    assert_eq!(fb.depth_format, Some(DepthFormat::Depth24Stencil8));
    assert_eq!(fb.depth_buffer, Some(GpuAddress(0x1830_0000)));
}
