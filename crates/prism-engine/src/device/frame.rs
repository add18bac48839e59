use super::Gpu;

/// Per-frame command recording context.
///
/// The host acquires its surface texture, creates a color view and wraps it
/// in a `Frame`; the pipeline records all pass commands into the frame's
/// encoder. Passes that read results back to the host (the compute pass)
/// call [`Frame::flush`] first so earlier passes' writes are submitted.
pub struct Frame {
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl Frame {
    /// Starts a frame targeting `view` (the host surface or any color view).
    pub fn new(gpu: &Gpu, view: wgpu::TextureView) -> Self {
        let encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });

        Self { view, encoder }
    }

    /// The color view the `"screen"` target resolves to this frame.
    pub fn surface_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// The active command encoder.
    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    /// Submits everything recorded so far and starts a fresh encoder.
    ///
    /// Required before any pass reads a target earlier passes wrote to
    /// through this frame.
    pub fn flush(&mut self, gpu: &Gpu) {
        let next = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });
        let done = std::mem::replace(&mut self.encoder, next);
        gpu.queue().submit(std::iter::once(done.finish()));
    }

    /// Submits the remaining recorded commands, consuming the frame.
    pub fn finish(self, gpu: &Gpu) {
        gpu.queue().submit(std::iter::once(self.encoder.finish()));
    }
}
