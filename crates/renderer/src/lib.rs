//! Renderer crate for mandelview, an animated Mandelbrot viewer.
//!
//! One thread pumps winit events, applies them to the viewer state and draws
//! one frame per iteration:
//!
//! ```text
//!   mandelview (bin)
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ pump_events ──▶ RuntimeState::handle_key
//!          │
//!          └─▶ compute_params ─▶ FpsOverlay::tick ─▶ GpuState::render
//!                                                   ├─ fractal pass
//!                                                   └─ overlay quad (optional)
//! ```
//!
//! Everything above the `gpu` and `window` modules is pure and can be driven
//! without a display: the animation curve, the CPU reference of the fractal
//! mapping, frame-rate sampling, label rasterization, overlay geometry and the
//! keyboard controller.

pub mod animation;
mod compile;
pub mod fps;
pub mod fractal;
mod gpu;
pub mod overlay;
pub mod runtime;
pub mod state;
pub mod text;
mod types;
mod window;

use anyhow::Result;

pub use gpu::FrameError;
pub use text::FontError;
pub use types::{OverlaySettings, RendererConfig, VsyncMode};

/// Entry point that owns the configuration and runs the viewer.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until the viewer is closed.
    pub fn run(&mut self) -> Result<()> {
        window::run(self.config.clone())
    }
}
