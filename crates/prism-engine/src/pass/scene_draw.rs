use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::device::Gpu;
use crate::scene::{mat4_mul, Mat4};
use crate::shader::Program;
use crate::target::RenderTarget;
use crate::RenderError;

use super::PassRenderCtx;

/// Per-object shader parameters, one 256-byte slot per object.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ObjectUniforms {
    mvp: Mat4,
    color: [f32; 4],
}

/// Dynamic-offset stride; matches the default wgpu uniform offset alignment.
const UNIFORM_STRIDE: u64 = 256;

const INITIAL_CAPACITY: u32 = 64;

type PipelineKey = (String, wgpu::TextureFormat, Option<wgpu::TextureFormat>);

/// Shared geometry-walk machinery for scene-drawing passes.
///
/// Owns one dynamic-offset uniform buffer (grown capacity-style, never per
/// frame at a stable object count) and caches compiled programs and render
/// pipelines per program/target-format combination.
pub(crate) struct SceneDraw {
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: u32,
    programs: HashMap<String, Program>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl SceneDraw {
    pub fn new(gpu: &Gpu) -> Self {
        let device = gpu.device();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("prism object uniforms"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<ObjectUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let (uniform_buffer, bind_group) =
            allocate_uniforms(gpu, &bind_group_layout, INITIAL_CAPACITY);

        Self {
            bind_group_layout,
            uniform_buffer,
            bind_group,
            capacity: INITIAL_CAPACITY,
            programs: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Pre-compiles `name` so catalog problems surface at pass init instead
    /// of mid-frame.
    pub fn precompile(
        &mut self,
        ctx: &super::PassInitCtx<'_>,
        name: &str,
    ) -> Result<(), RenderError> {
        if !self.programs.contains_key(name) {
            let program = ctx.compile_program(name)?;
            self.programs.insert(name.to_string(), program);
        }
        Ok(())
    }

    /// Walks the scene's visible objects and draws them into `target`.
    ///
    /// `forced_program` overrides every object's own program choice (the
    /// depth-encode pass uses this); otherwise each object's `program` name
    /// is resolved against the shader table and catalog.
    pub fn draw(
        &mut self,
        ctx: &mut PassRenderCtx<'_>,
        target: &RenderTarget,
        forced_program: Option<&str>,
        clear_color: wgpu::Color,
    ) -> Result<(), RenderError> {
        let gpu = ctx.gpu;
        let (width, height) = target.size();
        let aspect = width.max(1) as f32 / height.max(1) as f32;

        ctx.scene.update_visibility(aspect);
        let view_projection = ctx.scene.view_projection(aspect);
        let objects = ctx.scene.visible_objects();

        let visible: Vec<usize> = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.visible)
            .map(|(i, _)| i)
            .collect();

        self.ensure_capacity(gpu, visible.len() as u32);

        let color_format = target.color_format();
        let depth_format = target.depth_format();

        // Upload uniforms and resolve pipelines before command recording.
        for (slot, &index) in visible.iter().enumerate() {
            let object = &objects[index];
            let uniforms = ObjectUniforms {
                mvp: mat4_mul(view_projection, object.model),
                color: object.color,
            };
            gpu.queue().write_buffer(
                &self.uniform_buffer,
                slot as u64 * UNIFORM_STRIDE,
                bytemuck::bytes_of(&uniforms),
            );

            let program = forced_program.unwrap_or(&object.program);
            self.ensure_pipeline(ctx, program, color_format, depth_format)?;
        }

        let color_view = target.color_view(ctx.frame).clone();
        let depth_view = target.depth_view().cloned();

        let mut render_pass = ctx
            .frame
            .encoder()
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth_view.as_ref().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

        render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);

        let objects = ctx.scene.visible_objects();
        for (slot, &index) in visible.iter().enumerate() {
            let object = &objects[index];
            let program = forced_program.unwrap_or(&object.program);
            let key = (program.to_string(), color_format, depth_format);
            let pipeline = &self.pipelines[&key];

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(
                0,
                &self.bind_group,
                &[(slot as u64 * UNIFORM_STRIDE) as u32],
            );
            render_pass.set_vertex_buffer(0, object.mesh.vertex_buffer().slice(..));
            render_pass.draw(0..object.mesh.vertex_count(), 0..1);
        }

        Ok(())
    }

    fn ensure_capacity(&mut self, gpu: &Gpu, count: u32) {
        if count <= self.capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        let (uniform_buffer, bind_group) =
            allocate_uniforms(gpu, &self.bind_group_layout, capacity);
        self.uniform_buffer = uniform_buffer;
        self.bind_group = bind_group;
        self.capacity = capacity;
        log::debug!("object uniform buffer grown to {capacity} slots");
    }

    fn ensure_pipeline(
        &mut self,
        ctx: &PassRenderCtx<'_>,
        program_name: &str,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Result<(), RenderError> {
        let key = (program_name.to_string(), color_format, depth_format);
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }

        if !self.programs.contains_key(program_name) {
            let program = ctx.compile_program(program_name)?;
            self.programs.insert(program_name.to_string(), program);
        }
        let program = &self.programs[program_name];

        let device = ctx.gpu.device();
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(program_name),
            bind_group_layouts: &[&self.bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program_name),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: program.module(),
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 12,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: program.module(),
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert(key, pipeline);
        Ok(())
    }
}

fn allocate_uniforms(
    gpu: &Gpu,
    layout: &wgpu::BindGroupLayout,
    capacity: u32,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("prism object uniforms"),
        size: u64::from(capacity) * UNIFORM_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("prism object uniforms"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: std::num::NonZeroU64::new(std::mem::size_of::<ObjectUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}
