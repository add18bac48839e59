use crate::device::Gpu;
use crate::RenderError;

use super::buffers::padded_bytes_per_row;

/// Maps `slice` for reading and blocks until the device signals completion.
///
/// This is the mandatory finish barrier: host memory read from the mapped
/// range is only valid after it returns.
pub(crate) fn block_on_map(gpu: &Gpu, slice: &wgpu::BufferSlice<'_>) -> Result<(), RenderError> {
    let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });

    gpu.wait()?;

    pollster::block_on(receiver.receive())
        .ok_or_else(|| RenderError::device("buffer map callback dropped"))?
        .map_err(|e| RenderError::device(format!("buffer map failed: {e:?}")))
}

/// Synchronously reads a full RGBA8 pixel buffer back to host memory.
///
/// `staging` must be `COPY_DST | MAP_READ` and sized for the row-aligned
/// copy; rows are compacted into `out` (width * height * 4 bytes).
pub(crate) fn read_texture_rgba8(
    gpu: &Gpu,
    texture: &wgpu::Texture,
    staging: &wgpu::Buffer,
    out: &mut Vec<u8>,
) -> Result<(), RenderError> {
    if texture.format().block_copy_size(None) != Some(4) {
        return Err(RenderError::device(format!(
            "readback requires a 4-byte-per-pixel color format, got {:?}",
            texture.format()
        )));
    }

    let (width, height) = (texture.width(), texture.height());
    let bytes_per_row = padded_bytes_per_row(width);

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("prism readback encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    block_on_map(gpu, &slice)?;

    {
        let data = slice.get_mapped_range();
        let row_bytes = (width * 4) as usize;
        out.clear();
        out.reserve(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * bytes_per_row as usize;
            out.extend_from_slice(&data[start..start + row_bytes]);
        }
    }
    staging.unmap();

    Ok(())
}
