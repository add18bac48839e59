use crate::device::Gpu;

/// Bytes per row after wgpu's texture-copy row alignment.
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Reallocation is keyed on the required byte size only.
fn realloc_needed(current: Option<u64>, required: u64) -> bool {
    current != Some(required)
}

struct BufferSet {
    input: wgpu::Buffer,
    output: wgpu::Buffer,
    output_staging: wgpu::Buffer,
    pixel_staging: wgpu::Buffer,
}

impl BufferSet {
    fn allocate(gpu: &Gpu, width: u32, height: u32) -> Self {
        let device = gpu.device();
        let bytes = u64::from(width) * u64::from(height) * 4;
        let padded_bytes = u64::from(padded_bytes_per_row(width)) * u64::from(height);

        let input = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism kernel input"),
            size: bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism kernel output"),
            size: bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let output_staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism kernel output staging"),
            size: bytes,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let pixel_staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("prism pixel readback staging"),
            size: padded_bytes,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            input,
            output,
            output_staging,
            pixel_staging,
        }
    }
}

/// Size-keyed cache of the compute pass's device buffers.
///
/// Buffers are reallocated if and only if the required byte size changed
/// since the previous frame; the old set is released before the new one is
/// created, never resized in place. A frame at an unchanged size reuses the
/// previous allocations untouched.
pub struct KernelBuffers {
    size: Option<u64>,
    generation: u64,
    set: Option<BufferSet>,
}

impl KernelBuffers {
    pub fn new() -> Self {
        Self {
            size: None,
            generation: 0,
            set: None,
        }
    }

    /// Ensures buffers exist for a `width`x`height` RGBA8 image.
    ///
    /// Returns true when a reallocation happened.
    pub fn ensure_size(&mut self, gpu: &Gpu, width: u32, height: u32) -> bool {
        let bytes = u64::from(width) * u64::from(height) * 4;
        if !realloc_needed(self.size, bytes) {
            return false;
        }

        // Release the old set before allocating the new one.
        self.set = None;
        self.set = Some(BufferSet::allocate(gpu, width, height));
        self.size = Some(bytes);
        self.generation += 1;
        log::debug!("kernel buffers reallocated: {bytes} bytes (generation {})", self.generation);
        true
    }

    /// Required image byte size of the current allocation.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Bumps on every reallocation; stable across same-size frames.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn input(&self) -> Option<&wgpu::Buffer> {
        self.set.as_ref().map(|s| &s.input)
    }

    pub fn output(&self) -> Option<&wgpu::Buffer> {
        self.set.as_ref().map(|s| &s.output)
    }

    pub fn output_staging(&self) -> Option<&wgpu::Buffer> {
        self.set.as_ref().map(|s| &s.output_staging)
    }

    pub fn pixel_staging(&self) -> Option<&wgpu::Buffer> {
        self.set.as_ref().map(|s| &s.pixel_staging)
    }
}

impl Default for KernelBuffers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_use_allocates() {
        assert!(realloc_needed(None, 512 * 512 * 4));
    }

    #[test]
    fn same_size_reuses_the_allocation() {
        let bytes = 512 * 512 * 4;
        assert!(!realloc_needed(Some(bytes), bytes));
    }

    #[test]
    fn size_change_forces_fresh_buffers() {
        assert!(realloc_needed(Some(512 * 512 * 4), 640 * 480 * 4));
        // Shrinking also reallocates; there is no partial reuse.
        assert!(realloc_needed(Some(640 * 480 * 4), 512 * 512 * 4));
    }

    #[test]
    fn row_padding_rounds_up_to_the_copy_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(257), 1280);
        assert_eq!(padded_bytes_per_row(512), 2048);
    }
}
