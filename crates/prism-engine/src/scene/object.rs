use wgpu::util::DeviceExt;

use crate::device::Gpu;

use super::Mat4;

/// GPU-resident mesh: position-only vertices, drawn non-indexed.
#[derive(Clone)]
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl Mesh {
    /// Uploads `vertices` (xyz triples) into a vertex buffer.
    pub fn from_vertices(gpu: &Gpu, vertices: &[[f32; 3]]) -> Self {
        let vertex_buffer = gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("prism mesh vbo"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// One drawable object as supplied by the scene collaborator.
#[derive(Clone)]
pub struct SceneObject {
    /// Objects flagged not-visible are skipped by scene-drawing passes.
    pub visible: bool,
    /// Model transform applied before the scene's view-projection.
    pub model: Mat4,
    /// Mesh geometry.
    pub mesh: Mesh,
    /// Program name resolved against the pipeline's shader table, falling
    /// back to the shader catalog.
    pub program: String,
    /// Flat object color forwarded to the program.
    pub color: [f32; 4],
}

impl SceneObject {
    pub fn new(mesh: Mesh, model: Mat4) -> Self {
        Self {
            visible: true,
            model,
            mesh,
            program: "forward".to_string(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
