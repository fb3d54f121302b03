//! GPU mesh geometry for the 3D scene.
//!
//! This module provides [`Vertex3d`], the vertex format shared by all lit
//! meshes, and [`Mesh`], GPU-resident geometry with vertex and index buffers.
//! The demo scene only needs two primitives: a unit cube for the rotatable
//! object and a flat plane for the table beneath it.
//!
//! # Vertex Layout
//!
//! Each [`Vertex3d`] occupies 24 bytes:
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//!
//! The layout is exposed via [`Vertex3d::LAYOUT`] for pipeline creation.

use crate::gpu::GpuContext;
use wgpu::util::DeviceExt;

/// A vertex with position and surface normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// The 3D position of this vertex in model space.
    pub position: [f32; 3],
    /// The surface normal (should be normalized for correct lighting).
    pub normal: [f32; 3],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout descriptor for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// GPU-resident mesh geometry with vertex and index buffers.
///
/// Meshes are immutable after creation; to render different geometry, create
/// a new mesh.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Create a unit cube centered at the origin with per-face normals.
    pub fn cube(gpu: &GpuContext) -> Self {
        let h = 0.5;
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // +X
            (
                [1.0, 0.0, 0.0],
                [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]],
            ),
            // -X
            (
                [-1.0, 0.0, 0.0],
                [[-h, -h, h], [-h, h, h], [-h, h, -h], [-h, -h, -h]],
            ),
            // +Y
            (
                [0.0, 1.0, 0.0],
                [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            ),
            // -Y
            (
                [0.0, -1.0, 0.0],
                [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            ),
            // +Z
            (
                [0.0, 0.0, 1.0],
                [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            ),
            // -Z
            (
                [0.0, 0.0, -1.0],
                [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            ),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, corners) in &faces {
            let base = vertices.len() as u32;
            for corner in corners {
                vertices.push(Vertex3d::new(*corner, *normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(gpu, &vertices, &indices)
    }

    /// Create a flat `size`×`size` plane in the XZ plane, centered at the
    /// origin, facing +Y.
    pub fn plane(gpu: &GpuContext, size: f32) -> Self {
        let h = size * 0.5;
        let up = [0.0, 1.0, 0.0];

        let vertices = [
            Vertex3d::new([-h, 0.0, h], up),
            Vertex3d::new([h, 0.0, h], up),
            Vertex3d::new([h, 0.0, -h], up),
            Vertex3d::new([-h, 0.0, -h], up),
        ];
        let indices = [0, 1, 2, 0, 2, 3];

        Self::new(gpu, &vertices, &indices)
    }
}
