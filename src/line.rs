//! Colored 3D line segments and their render pass.
//!
//! The demo draws two families of lines: static world axes at the origin and
//! the object's local axes, which follow the object's orientation. A [`Line`]
//! holds a two-vertex GPU buffer in model space; [`LinePass`] draws any number
//! of them in one pass, each with its own model matrix and color supplied
//! through a dynamic-offset uniform buffer.

use crate::gpu::{DEPTH_FORMAT, GpuContext};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// Maximum number of lines drawn per frame.
const MAX_LINES: usize = 64;

/// Uniform slot stride. Dynamic offsets must be aligned to
/// `min_uniform_buffer_offset_alignment`, which is at most 256 on the
/// default limits.
const UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LineVertex {
    position: [f32; 3],
}

impl LineVertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewUniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LineUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

/// A line segment from `start` to `end` in model space.
pub struct Line {
    vertex_buffer: wgpu::Buffer,
    /// Line color as RGBA.
    pub color: [f32; 4],
}

impl Line {
    pub fn new(gpu: &GpuContext, start: Vec3, end: Vec3, color: [f32; 4]) -> Self {
        let vertices = [
            LineVertex {
                position: start.to_array(),
            },
            LineVertex {
                position: end.to_array(),
            },
        ];

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Line Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Self {
            vertex_buffer,
            color,
        }
    }
}

/// A queued line draw: the segment plus the model matrix positioning it.
pub struct LineDraw<'a> {
    pub line: &'a Line,
    pub model: Mat4,
}

/// Depth-tested line rendering with per-line model matrices.
pub struct LinePass {
    pipeline: wgpu::RenderPipeline,
    view_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    line_buffer: wgpu::Buffer,
    line_bind_group: wgpu::BindGroup,
}

impl LinePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line View Uniforms"),
            size: std::mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Line View Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Line View Bind Group"),
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        // One 256-byte slot per line, addressed with a dynamic offset so all
        // lines share a single bind group.
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Uniforms"),
            size: MAX_LINES as u64 * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Line Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<LineUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let line_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Line Uniform Bind Group"),
            layout: &line_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &line_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<LineUniforms>() as u64),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&view_bind_group_layout, &line_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[LineVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            view_buffer,
            view_bind_group,
            line_buffer,
            line_bind_group,
        }
    }

    /// Draw a batch of lines. Lines beyond the buffer capacity are skipped
    /// with a warning.
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        view_proj: Mat4,
        draws: &[LineDraw],
    ) {
        if draws.is_empty() {
            return;
        }

        if draws.len() > MAX_LINES {
            log::warn!("line batch of {} exceeds capacity {}", draws.len(), MAX_LINES);
        }
        let draws = &draws[..draws.len().min(MAX_LINES)];

        let view_uniforms = ViewUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        gpu.queue.write_buffer(
            &self.view_buffer,
            0,
            bytemuck::cast_slice(&[view_uniforms]),
        );

        // All uniform writes land before the pass executes at submit time,
        // so each draw gets its own slot.
        for (i, draw) in draws.iter().enumerate() {
            let uniforms = LineUniforms {
                model: draw.model.to_cols_array_2d(),
                color: draw.line.color,
            };
            gpu.queue.write_buffer(
                &self.line_buffer,
                i as u64 * UNIFORM_STRIDE,
                bytemuck::cast_slice(&[uniforms]),
            );
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.view_bind_group, &[]);

        for (i, draw) in draws.iter().enumerate() {
            let offset = (i as u64 * UNIFORM_STRIDE) as u32;
            render_pass.set_bind_group(1, &self.line_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, draw.line.vertex_buffer.slice(..));
            render_pass.draw(0..2, 0..1);
        }
    }
}
