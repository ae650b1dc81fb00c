use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;
use thiserror::Error;
use tracing::{info, trace};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::animation::{aspect_ratio, compute_params, AnimationParams};
use crate::fractal::FULLSCREEN_QUAD;
use crate::overlay::overlay_draw_plan;
use crate::types::RendererConfig;

use super::context::GpuContext;
use super::overlay::OverlayResources;
use super::pipeline::{FractalPipeline, OverlayPipeline};
use super::uniforms::FractalUniforms;

/// Per-frame failure while acquiring or presenting a surface texture.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
    #[error("GPU ran out of memory while acquiring a frame")]
    OutOfMemory,
}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(value: wgpu::SurfaceError) -> Self {
        match value {
            wgpu::SurfaceError::OutOfMemory => FrameError::OutOfMemory,
            other => FrameError::Surface(other),
        }
    }
}

/// What the frame loop does after a failed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameRecovery {
    /// Reconfigure the surface and skip this frame.
    Reconfigure,
    /// Log and skip this frame.
    Skip,
    /// Abort the loop.
    Fatal,
}

impl FrameError {
    pub(crate) fn recovery(&self) -> FrameRecovery {
        match self {
            FrameError::OutOfMemory => FrameRecovery::Fatal,
            FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                FrameRecovery::Reconfigure
            }
            FrameError::Surface(_) => FrameRecovery::Skip,
        }
    }
}

/// Both render stages and everything they draw from.
pub(crate) struct GpuState {
    context: GpuContext,
    fractal: FractalPipeline,
    overlay: OverlayPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    quad_buffer: wgpu::Buffer,
    overlay_resources: OverlayResources,
    overlay_size: (u32, u32),
}

impl GpuState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let initial_size = window.inner_size();
        let context = GpuContext::new(window, initial_size, config.vsync)
            .context("failed to initialise GPU context")?;

        let fractal = FractalPipeline::new(&context.device, context.surface_format)
            .context("failed to build fractal pipeline")?;
        let overlay = OverlayPipeline::new(&context.device, context.surface_format)
            .context("failed to build overlay pipeline")?;

        let uniforms = FractalUniforms::from(&compute_params(
            0.0,
            aspect_ratio(context.size.width, context.size.height),
        ));
        let uniform_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("fractal uniform buffer"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("fractal uniform bind group"),
                layout: &fractal.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let quad_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("fullscreen quad"),
                contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let overlay_resources = OverlayResources::new(&context.device);

        info!(
            width = context.size.width,
            height = context.size.height,
            format = ?context.surface_format,
            vsync = %config.vsync,
            "renderer ready"
        );

        Ok(Self {
            context,
            fractal,
            overlay,
            uniform_buffer,
            uniform_bind_group,
            quad_buffer,
            overlay_resources,
            overlay_size: config.overlay.bitmap_size,
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size == self.context.size {
            return;
        }
        trace!(
            width = new_size.width,
            height = new_size.height,
            "reconfiguring surface"
        );
        self.context.resize(new_size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Acquires the next swapchain image.
    pub(crate) fn acquire(&mut self) -> Result<wgpu::SurfaceTexture, FrameError> {
        Ok(self.context.surface.get_current_texture()?)
    }

    /// Draws the fractal and, when planned, the overlay into `frame`, then
    /// presents it. A new label bitmap replaces the overlay texture first.
    pub(crate) fn render(
        &mut self,
        frame: wgpu::SurfaceTexture,
        params: &AnimationParams,
        label: Option<&RgbaImage>,
        overlay_enabled: bool,
    ) {
        let context = &self.context;
        context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&FractalUniforms::from(params)),
        );

        if let Some(bitmap) = label {
            self.overlay_resources.upload(
                &context.device,
                &context.queue,
                &self.overlay.texture_layout,
                bitmap,
            );
        }

        let plan = overlay_draw_plan(
            overlay_enabled,
            self.overlay_resources.has_texture(),
            context.size,
            self.overlay_size,
        );
        if let Some(quad) = plan.as_ref() {
            self.overlay_resources.write_quad(&context.queue, quad);
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_viewport(
                0.0,
                0.0,
                context.size.width as f32,
                context.size.height as f32,
                0.0,
                1.0,
            );

            pass.set_pipeline(&self.fractal.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            pass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);

            if let (Some(quad), Some(bind_group)) =
                (plan.as_ref(), self.overlay_resources.bind_group())
            {
                pass.set_pipeline(&self.overlay.pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.set_vertex_buffer(0, self.overlay_resources.vertex_buffer.slice(..));
                pass.draw(0..quad.len() as u32, 0..1);
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
