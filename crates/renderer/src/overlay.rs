use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

/// Vertices per overlay quad (two triangles).
pub const OVERLAY_VERTEX_COUNT: usize = 6;

/// Fixed capacity of the overlay vertex buffer in bytes.
pub const OVERLAY_BUFFER_SIZE: u64 =
    (OVERLAY_VERTEX_COUNT * std::mem::size_of::<OverlayVertex>()) as u64;

/// Interleaved position and texture coordinate, matching `in_pos`/`in_uv`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl OverlayVertex {
    const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Quad pinned to the top-left corner of the viewport covering `overlay`
/// framebuffer pixels.
///
/// The bitmap is uploaded bottom-up, so the top edge samples `v = 1`.
pub fn overlay_quad(
    framebuffer: PhysicalSize<u32>,
    overlay: (u32, u32),
) -> [OverlayVertex; OVERLAY_VERTEX_COUNT] {
    let width = framebuffer.width.max(1) as f32;
    let height = framebuffer.height.max(1) as f32;
    let x0 = -1.0;
    let x1 = -1.0 + 2.0 * overlay.0 as f32 / width;
    let y0 = 1.0;
    let y1 = 1.0 - 2.0 * overlay.1 as f32 / height;

    [
        OverlayVertex::new(x0, y0, 0.0, 1.0),
        OverlayVertex::new(x1, y0, 1.0, 1.0),
        OverlayVertex::new(x0, y1, 0.0, 0.0),
        OverlayVertex::new(x0, y1, 0.0, 0.0),
        OverlayVertex::new(x1, y0, 1.0, 1.0),
        OverlayVertex::new(x1, y1, 1.0, 0.0),
    ]
}

/// Geometry to draw this frame, or `None` when nothing should be drawn.
pub fn overlay_draw_plan(
    overlay_enabled: bool,
    has_texture: bool,
    framebuffer: PhysicalSize<u32>,
    overlay: (u32, u32),
) -> Option<[OverlayVertex; OVERLAY_VERTEX_COUNT]> {
    if !overlay_enabled || !has_texture {
        return None;
    }
    Some(overlay_quad(framebuffer, overlay))
}
