use std::borrow::Cow;

use anyhow::{anyhow, Result};
use wgpu::naga::ShaderStage;

/// Vertex and fragment modules of one GPU program.
pub(crate) struct Program {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// Compiles a vertex/fragment GLSL pair through wgpu's GLSL front end.
///
/// Validation errors raised while creating the modules are captured and
/// returned instead of being reported through the uncaptured error handler.
pub(crate) fn compile_program(
    device: &wgpu::Device,
    label: &str,
    vertex_source: &'static str,
    fragment_source: &'static str,
) -> Result<Program> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let vertex = compile_stage(device, label, vertex_source, ShaderStage::Vertex);
    let fragment = compile_stage(device, label, fragment_source, ShaderStage::Fragment);
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("failed to compile {label} program: {err}"));
    }
    Ok(Program { vertex, fragment })
}

fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    stage: ShaderStage,
) -> wgpu::ShaderModule {
    let stage_label = match stage {
        ShaderStage::Vertex => format!("{label} vertex"),
        _ => format!("{label} fragment"),
    };
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&stage_label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    })
}

/// Pass-through vertex shader for the full-screen quad.
pub(crate) const FRACTAL_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec2 in_pos;
layout(location = 0) out vec2 v_pos;

void main() {
    v_pos = in_pos;
    gl_Position = vec4(in_pos, 0.0, 1.0);
}
";

/// Escape-time Mandelbrot colouring.
///
/// The uniform block layout must match `FractalUniforms` in `gpu/uniforms.rs`.
pub(crate) const FRACTAL_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_pos;
layout(location = 0) out vec4 frag_color;

layout(std140, set = 0, binding = 0) uniform FractalParams {
    vec2 center;
    float zoom;
    float aspect_ratio;
    int max_iter;
    vec3 base_color;
} params;

void main() {
    vec2 uv = v_pos;
    uv.x *= params.aspect_ratio;
    vec2 c = uv * params.zoom + params.center;
    vec2 z = vec2(0.0);
    int i = 0;
    while (i < params.max_iter) {
        if (dot(z, z) > 4.0) {
            break;
        }
        z = vec2(z.x * z.x - z.y * z.y, 2.0 * z.x * z.y) + c;
        i++;
    }
    float t = float(i) / float(params.max_iter);
    frag_color = vec4(params.base_color * t, 1.0);
}
";

/// Overlay quad vertex shader; positions are already in device coordinates.
pub(crate) const OVERLAY_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec2 in_pos;
layout(location = 1) in vec2 in_uv;
layout(location = 0) out vec2 uv;

void main() {
    uv = in_uv;
    gl_Position = vec4(in_pos, 0.0, 1.0);
}
";

/// Samples the FPS label texture.
pub(crate) const OVERLAY_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec2 uv;
layout(location = 0) out vec4 frag_color;

layout(set = 0, binding = 0) uniform texture2D tex;
layout(set = 0, binding = 1) uniform sampler tex_sampler;

void main() {
    frag_color = texture(sampler2D(tex, tex_sampler), uv);
}
";
