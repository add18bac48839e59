use crate::shader::{self, UniformValue};
use crate::RenderError;

use super::{PassInitCtx, PassRenderCtx, RenderPass};

struct BlitState {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

/// Samples a named target's color attachment onto another target with a
/// full-screen quad, typically as the final hop onto `"screen"`.
pub struct BlitPass {
    name: String,
    output: String,
    input: String,
    state: Option<BlitState>,
}

impl BlitPass {
    pub fn new(output: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: "blit".to_string(),
            output: output.into(),
            input: input.into(),
            state: None,
        }
    }
}

impl RenderPass for BlitPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, ctx: &mut PassInitCtx<'_>) -> Result<(), RenderError> {
        let gpu = ctx.gpu();
        let device = gpu.device();

        let program = ctx.compile_program(shader::DRAW_TEXTURE)?;

        let output = ctx.target(&self.output)?;
        let (out_width, out_height) = output.size();
        let color_format = output.color_format();

        let input = ctx.target(&self.input)?;
        let input_view = input
            .color_texture()
            .map(|texture| texture.create_view(&wgpu::TextureViewDescriptor::default()))
            .ok_or_else(|| {
                RenderError::device(format!(
                    "blit input '{}' must be an offscreen target",
                    self.input
                ))
            })?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("prism blit sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // The fragment shader divides frag coords by canvas_size; the
        // catalog default only applies when the target size is unknown.
        let canvas_size = if out_width > 0 && out_height > 0 {
            [out_width as f32, out_height as f32]
        } else if let Some(UniformValue::Vec2(value)) = program.uniform_default("canvas_size") {
            value
        } else {
            [512.0, 512.0]
        };
        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism blit params"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        gpu.queue()
            .write_buffer(&params, 0, bytemuck::cast_slice(&[canvas_size[0], canvas_size[1], 0.0, 0.0]));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("prism blit bindings"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(16),
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism blit bindings"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&input_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.as_entire_binding(),
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prism blit"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism blit"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: program.module(),
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
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
                // Same coverage as the original's quad fan.
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.state = Some(BlitState {
            pipeline,
            bind_group,
        });
        Ok(())
    }

    fn render(&mut self, ctx: &mut PassRenderCtx<'_>) -> Result<(), RenderError> {
        let state = self.state.as_ref().ok_or_else(|| RenderError::NotInitialized {
            what: "blit pass".to_string(),
        })?;
        let target = ctx.target(&self.output)?;
        let (width, height) = target.size();
        let color_view = target.color_view(ctx.frame).clone();

        let mut render_pass = ctx
            .frame
            .encoder()
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism blit pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

        render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        render_pass.set_pipeline(&state.pipeline);
        render_pass.set_bind_group(0, &state.bind_group, &[]);
        render_pass.draw(0..4, 0..1);

        Ok(())
    }
}
