use bytemuck::{Pod, Zeroable};

use crate::animation::AnimationParams;

/// std140 mirror of the `FractalParams` uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FractalUniforms {
    pub center: [f32; 2],
    pub zoom: f32,
    pub aspect_ratio: f32,
    pub max_iter: i32,
    pub _padding0: [f32; 3],
    pub base_color: [f32; 3],
    pub _padding1: f32,
}

impl From<&AnimationParams> for FractalUniforms {
    fn from(params: &AnimationParams) -> Self {
        Self {
            center: params.center,
            zoom: params.zoom,
            aspect_ratio: params.aspect_ratio,
            max_iter: params.max_iterations,
            _padding0: [0.0; 3],
            base_color: params.base_color,
            _padding1: 0.0,
        }
    }
}

impl FractalUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}
