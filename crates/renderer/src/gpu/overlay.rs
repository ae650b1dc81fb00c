use image::RgbaImage;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::overlay::{OverlayVertex, OVERLAY_BUFFER_SIZE, OVERLAY_VERTEX_COUNT};

/// GPU side of the FPS overlay: the label texture plus its quad buffer.
pub(crate) struct OverlayResources {
    texture: Option<OverlayTexture>,
    sampler: wgpu::Sampler,
    pub vertex_buffer: wgpu::Buffer,
}

struct OverlayTexture {
    texture: wgpu::Texture,
    _view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

impl OverlayResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("overlay sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("overlay vertex buffer"),
            size: OVERLAY_BUFFER_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            texture: None,
            sampler,
            vertex_buffer,
        }
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.texture.as_ref().map(|texture| &texture.bind_group)
    }

    /// Replaces the label texture, releasing the previous one first.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        bitmap: &RgbaImage,
    ) {
        if let Some(previous) = self.texture.take() {
            previous.texture.destroy();
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("fps overlay texture"),
                size: wgpu::Extent3d {
                    width: bitmap.width(),
                    height: bitmap.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            bitmap.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fps overlay bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.texture = Some(OverlayTexture {
            texture,
            _view: view,
            bind_group,
        });
    }

    pub fn write_quad(
        &self,
        queue: &wgpu::Queue,
        quad: &[OverlayVertex; OVERLAY_VERTEX_COUNT],
    ) {
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(quad));
    }
}
