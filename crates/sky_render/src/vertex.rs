/// Screen-space overlay vertex. Overlay coordinates run from (0, 0) at the
/// top-left to (aspect, 1) at the bottom-right, so x extends past 1.0 on
/// wide viewports.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl OverlayVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            tex_coords: [u, v],
        }
    }
}

/// Flattens vertices to the packed `x, y, u, v` float layout overlays are
/// batched in.
pub fn overlay_floats(vertices: &[OverlayVertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}
