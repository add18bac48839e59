/// Initialization parameters for the device context.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete backend requirement exists.
#[derive(Debug, Clone)]
pub struct DeviceInit {
    /// Case-insensitive substring matched against adapter names.
    ///
    /// The first adapter whose name contains this substring is selected;
    /// when no adapter matches (or no preference is set) the first enumerated
    /// adapter is used.
    pub preferred_adapter: Option<String>,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for DeviceInit {
    fn default() -> Self {
        Self {
            preferred_adapter: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Description of the host-owned output surface.
///
/// The pipeline registers the surface under the name `"screen"` but never
/// owns, resizes or destroys it; the host supplies the actual color view
/// each frame.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInfo {
    /// Drawable width in pixels.
    pub width: u32,
    /// Drawable height in pixels.
    pub height: u32,
    /// Color format of the surface view.
    pub color_format: wgpu::TextureFormat,
    /// Depth format used for offscreen targets that mirror the surface.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for SurfaceInfo {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_format: wgpu::TextureFormat::Depth16Unorm,
        }
    }
}

impl SurfaceInfo {
    /// Width/height ratio used for projection matrices.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}
