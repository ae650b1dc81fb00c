use anyhow::{anyhow, Result};

use crate::compile::{
    compile_program, Program, FRACTAL_FRAGMENT_GLSL, FRACTAL_VERTEX_GLSL, OVERLAY_FRAGMENT_GLSL,
    OVERLAY_VERTEX_GLSL,
};
use crate::overlay::OverlayVertex;

use super::uniforms::FractalUniforms;

/// Fractal stage: full-screen quad shaded from a single uniform block.
pub(crate) struct FractalPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl FractalPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Result<Self> {
        let program = compile_program(
            device,
            "fractal",
            FRACTAL_VERTEX_GLSL,
            FRACTAL_FRAGMENT_GLSL,
        )?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fractal uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(FractalUniforms::SIZE),
                },
                count: None,
            }],
        });

        let vertex_attributes = wgpu::vertex_attr_array![0 => Float32x2];
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &vertex_attributes,
        };

        let pipeline = build_pipeline(
            device,
            "fractal",
            &program,
            &uniform_layout,
            vertex_layout,
            surface_format,
            None,
        )?;

        Ok(Self {
            pipeline,
            uniform_layout,
        })
    }
}

/// Overlay stage: textured quad blended over the fractal.
pub(crate) struct OverlayPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl OverlayPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Result<Self> {
        let program = compile_program(
            device,
            "overlay",
            OVERLAY_VERTEX_GLSL,
            OVERLAY_FRAGMENT_GLSL,
        )?;

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("overlay texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let vertex_attributes = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &vertex_attributes,
        };

        let pipeline = build_pipeline(
            device,
            "overlay",
            &program,
            &texture_layout,
            vertex_layout,
            surface_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        )?;

        Ok(Self {
            pipeline,
            texture_layout,
        })
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    program: &Program,
    bind_group_layout: &wgpu::BindGroupLayout,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    surface_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> Result<wgpu::RenderPipeline> {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} pipeline layout")),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some("main"),
            buffers: &[vertex_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("failed to link {label} pipeline: {err}"));
    }

    Ok(pipeline)
}
