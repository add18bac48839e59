//! Named render targets.
//!
//! Two kinds exist: offscreen targets the pipeline allocates and owns, and
//! the host's output surface, which the pipeline references but never
//! destroys. Passes address both purely by name through the pipeline's
//! target registry; binding happens when a pass begins a render pass on the
//! resolved views.

use crate::device::{Frame, Gpu, SurfaceInfo};

/// Allocation parameters for an owned offscreen target.
#[derive(Debug, Clone, Copy)]
pub struct TargetSpec {
    pub width: u32,
    pub height: u32,
    pub color_format: wgpu::TextureFormat,
    /// Depth attachment format; combined depth-stencil formats cover the
    /// stencil case. `None` allocates a color-only target.
    pub depth_format: Option<wgpu::TextureFormat>,
    /// When false the depth buffer is attachment-only (the GL-renderbuffer
    /// equivalent); when true it is also sampleable by later passes.
    pub depth_readable: bool,
}

impl TargetSpec {
    /// Target matching the host surface: same size, same color format, with
    /// an attachment-only depth buffer.
    pub fn back_buffer(surface: &SurfaceInfo) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            color_format: surface.color_format,
            depth_format: Some(surface.depth_format),
            depth_readable: false,
        }
    }
}

/// An offscreen framebuffer owned by one pipeline.
pub struct OffscreenTarget {
    spec: TargetSpec,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: Option<wgpu::TextureView>,
}

/// A named render target: pipeline-owned offscreen memory or the borrowed
/// host surface.
pub enum RenderTarget {
    Offscreen(OffscreenTarget),
    Surface(SurfaceInfo),
}

impl RenderTarget {
    /// Allocates an owned offscreen target. Freed when the pipeline drops.
    pub fn offscreen(gpu: &Gpu, spec: TargetSpec) -> Self {
        let device = gpu.device();

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("prism offscreen color"),
            size: wgpu::Extent3d {
                width: spec.width,
                height: spec.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: spec.color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_view = spec.depth_format.map(|format| {
            let usage = if spec.depth_readable {
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
            } else {
                wgpu::TextureUsages::RENDER_ATTACHMENT
            };
            let depth = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("prism offscreen depth"),
                size: wgpu::Extent3d {
                    width: spec.width,
                    height: spec.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            });
            depth.create_view(&wgpu::TextureViewDescriptor::default())
        });

        Self::Offscreen(OffscreenTarget {
            spec,
            color,
            color_view,
            depth_view,
        })
    }

    /// References the host surface described by `info`. Never owned.
    pub fn surface(info: SurfaceInfo) -> Self {
        Self::Surface(info)
    }

    pub fn is_surface(&self) -> bool {
        matches!(self, Self::Surface(_))
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Offscreen(t) => (t.spec.width, t.spec.height),
            Self::Surface(info) => (info.width, info.height),
        }
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        match self {
            Self::Offscreen(t) => t.spec.color_format,
            Self::Surface(info) => info.color_format,
        }
    }

    /// Resolves the color view: the owned texture's view, or the frame's
    /// surface view. Surface resolution happens per frame by design.
    pub fn color_view<'a>(&'a self, frame: &'a Frame) -> &'a wgpu::TextureView {
        match self {
            Self::Offscreen(t) => &t.color_view,
            Self::Surface(_) => frame.surface_view(),
        }
    }

    /// Depth attachment format, when the target carries one. Surface targets
    /// never do; the host owns any depth buffer for the surface.
    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        match self {
            Self::Offscreen(t) => t.spec.depth_format,
            Self::Surface(_) => None,
        }
    }

    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        match self {
            Self::Offscreen(t) => t.depth_view.as_ref(),
            Self::Surface(_) => None,
        }
    }

    /// The color texture for host readback. Surface targets are not
    /// readable by the core.
    pub fn color_texture(&self) -> Option<&wgpu::Texture> {
        match self {
            Self::Offscreen(t) => Some(&t.color),
            Self::Surface(_) => None,
        }
    }
}
