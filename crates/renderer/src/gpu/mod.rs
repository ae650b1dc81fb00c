//! GPU side of the viewer.
//!
//! - `context` owns the wgpu instance, device and surface and reconfigures the
//!   swapchain when the window resizes.
//! - `pipeline` links the fractal and overlay programs into render pipelines.
//! - `uniforms` mirrors the fractal program's uniform block.
//! - `overlay` holds the FPS label texture and its quad buffer.
//! - `state` records one render pass per frame and classifies surface errors.

mod context;
mod overlay;
mod pipeline;
mod state;
mod uniforms;

pub use state::FrameError;
pub(crate) use state::{FrameRecovery, GpuState};
