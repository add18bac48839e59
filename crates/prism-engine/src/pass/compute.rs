use crate::compute::{
    block_on_map, read_texture_rgba8, ComputeKernel, DispatchGrid, KernelBuffers,
};
use crate::RenderError;

use super::{PassInitCtx, PassRenderCtx, RenderPass};

/// Offloads per-pixel work on a render target to a compute kernel.
///
/// Per frame: flush the frame encoder so earlier passes' writes are
/// submitted, read the input target's pixels back to host memory, upload
/// them into the kernel's input buffer, dispatch over the 2-D grid, copy the
/// output buffer to staging and block on the finish barrier. The processed
/// pixels are then uploaded into the output target's color texture and kept
/// host-side, readable through [`ComputePass::output_pixels`].
pub struct ComputePass {
    name: String,
    output: String,
    input: String,
    kernel_name: String,
    kernel: Option<ComputeKernel>,
    params: Option<wgpu::Buffer>,
    buffers: KernelBuffers,
    // Rebuilt whenever the buffer generation changes.
    bind_group: Option<(u64, wgpu::BindGroup)>,
    input_pixels: Vec<u8>,
    output_pixels: Vec<u8>,
}

impl ComputePass {
    pub fn new(
        output: impl Into<String>,
        input: impl Into<String>,
        kernel_name: impl Into<String>,
    ) -> Self {
        let kernel_name = kernel_name.into();
        Self {
            name: format!("compute:{kernel_name}"),
            output: output.into(),
            input: input.into(),
            kernel_name,
            kernel: None,
            params: None,
            buffers: KernelBuffers::new(),
            bind_group: None,
            input_pixels: Vec::new(),
            output_pixels: Vec::new(),
        }
    }

    /// The processed pixels of the most recent frame, compact RGBA8 rows.
    pub fn output_pixels(&self) -> &[u8] {
        &self.output_pixels
    }
}

impl RenderPass for ComputePass {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, ctx: &mut PassInitCtx<'_>) -> Result<(), RenderError> {
        self.kernel = Some(ctx.compile_kernel(&self.kernel_name)?);
        self.params = Some(ctx.gpu().device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism kernel params"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        Ok(())
    }

    fn render(&mut self, ctx: &mut PassRenderCtx<'_>) -> Result<(), RenderError> {
        let gpu = ctx.gpu;
        let (kernel, params) = match (&self.kernel, &self.params) {
            (Some(kernel), Some(params)) => (kernel, params),
            _ => {
                return Err(RenderError::NotInitialized {
                    what: format!("compute pass '{}'", self.name),
                })
            }
        };

        // Earlier passes recorded into the shared frame encoder; their
        // writes must be submitted before the readback copy below.
        ctx.frame.flush(gpu);

        let input_target = ctx.target(&self.input)?;
        let input_texture = input_target.color_texture().ok_or_else(|| {
            RenderError::device(format!(
                "compute input '{}' must be an offscreen target",
                self.input
            ))
        })?;
        let (width, height) = input_target.size();

        let reallocated = self.buffers.ensure_size(gpu, width, height);
        if reallocated {
            self.bind_group = None;
        }
        let (input_buf, output_buf, output_staging, pixel_staging) = match (
            self.buffers.input(),
            self.buffers.output(),
            self.buffers.output_staging(),
            self.buffers.pixel_staging(),
        ) {
            (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
            _ => return Err(RenderError::device("kernel buffers missing after ensure")),
        };

        read_texture_rgba8(gpu, input_texture, pixel_staging, &mut self.input_pixels)?;

        // Async uploads; the queue orders them before the dispatch.
        gpu.queue().write_buffer(input_buf, 0, &self.input_pixels);
        gpu.queue()
            .write_buffer(params, 0, bytemuck::cast_slice(&[width, height, 0u32, 0u32]));

        let bind_group = match &self.bind_group {
            Some((generation, bind_group)) if *generation == self.buffers.generation() => {
                bind_group.clone()
            }
            _ => {
                let bind_group = kernel.bind(gpu, input_buf, output_buf, params);
                self.bind_group = Some((self.buffers.generation(), bind_group.clone()));
                bind_group
            }
        };

        let grid = DispatchGrid::new(width, height);
        let (groups_x, groups_y) = grid.workgroup_counts();

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism compute encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&self.name),
                timestamp_writes: None,
            });
            pass.set_pipeline(kernel.pipeline());
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        let byte_len = u64::from(width) * u64::from(height) * 4;
        encoder.copy_buffer_to_buffer(output_buf, 0, output_staging, 0, byte_len);
        gpu.queue().submit(std::iter::once(encoder.finish()));

        // Mandatory finish barrier; the mapped range is invalid before it.
        let slice = output_staging.slice(..);
        block_on_map(gpu, &slice)?;
        {
            let data = slice.get_mapped_range();
            self.output_pixels.clear();
            self.output_pixels.extend_from_slice(&data);
        }
        output_staging.unmap();

        // Post the processed image into the output target so later passes
        // sample the kernel's result instead of the raw scene.
        let output_target = ctx.target(&self.output)?;
        let output_texture = output_target.color_texture().ok_or_else(|| {
            RenderError::device(format!(
                "compute output '{}' must be an offscreen target",
                self.output
            ))
        })?;
        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: output_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.output_pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }
}
