//! Pass contract and the built-in pass variants.
//!
//! A pass is one stage of a pipeline. Passes never hold references to each
//! other or to the pipeline; everything they need arrives through the init
//! and render contexts, and cross-pass data flows exclusively through named
//! render targets resolved at render time.

mod blit;
mod compute;
mod depth;
mod forward;
mod scene_draw;
mod sequence;

pub use blit::BlitPass;
pub use compute::ComputePass;
pub use depth::{decode_depth, encode_depth, DepthEncodePass};
pub use forward::ForwardPass;
pub use sequence::PassSequence;

use crate::compute::{ComputeKernel, KernelCatalog};
use crate::device::{Frame, Gpu, SurfaceInfo};
use crate::pipeline::registry::NamedRegistry;
use crate::scene::Scene;
use crate::shader::{validate_wgsl, Program, ProgramDef, ShaderCatalog};
use crate::target::RenderTarget;
use crate::RenderError;

/// One stage of a pipeline.
///
/// `init` runs exactly once, after the pipeline has registered its render
/// targets; `render` runs once per frame in pass insertion order.
pub trait RenderPass {
    fn name(&self) -> &str;

    fn init(&mut self, ctx: &mut PassInitCtx<'_>) -> Result<(), RenderError>;

    fn render(&mut self, ctx: &mut PassRenderCtx<'_>) -> Result<(), RenderError>;
}

/// Everything a pass may touch during `init`.
pub struct PassInitCtx<'a> {
    pub(crate) gpu: &'a Gpu,
    pub(crate) targets: &'a NamedRegistry<RenderTarget>,
    pub(crate) shaders: &'a ShaderCatalog,
    pub(crate) shader_table: &'a NamedRegistry<ProgramDef>,
    pub(crate) kernels: &'a KernelCatalog,
    pub(crate) surface: &'a SurfaceInfo,
}

impl<'a> PassInitCtx<'a> {
    pub fn gpu(&self) -> &'a Gpu {
        self.gpu
    }

    pub fn surface(&self) -> &'a SurfaceInfo {
        self.surface
    }

    /// Resolves a named render target.
    ///
    /// Targets are registered before any pass initializes, so a miss here is
    /// a pipeline configuration error.
    pub fn target(&self, name: &str) -> Result<&'a RenderTarget, RenderError> {
        resolve_target(self.targets, name)
    }

    /// Compiles the named program: the pipeline-local shader table shadows
    /// the injected catalog.
    pub fn compile_program(&self, name: &str) -> Result<Program, RenderError> {
        compile_program(self.gpu, self.shaders, self.shader_table, name)
    }

    /// Compiles the named kernel from the injected catalog.
    pub fn compile_kernel(&self, name: &str) -> Result<ComputeKernel, RenderError> {
        self.kernels.compile(name, self.gpu)
    }
}

/// Everything a pass may touch during `render`.
///
/// `frame` and `scene` are public fields so a pass can borrow them mutably
/// while holding targets resolved through [`PassRenderCtx::target`].
pub struct PassRenderCtx<'a> {
    pub(crate) gpu: &'a Gpu,
    pub(crate) targets: &'a NamedRegistry<RenderTarget>,
    pub(crate) shaders: &'a ShaderCatalog,
    pub(crate) shader_table: &'a NamedRegistry<ProgramDef>,
    pub(crate) surface: &'a SurfaceInfo,
    pub frame: &'a mut Frame,
    pub scene: &'a mut dyn Scene,
}

impl<'a> PassRenderCtx<'a> {
    pub fn gpu(&self) -> &'a Gpu {
        self.gpu
    }

    pub fn surface(&self) -> &'a SurfaceInfo {
        self.surface
    }

    /// Resolves a named render target for this frame.
    pub fn target(&self, name: &str) -> Result<&'a RenderTarget, RenderError> {
        resolve_target(self.targets, name)
    }

    /// Compiles the named program, shader table first. Used by scene-drawing
    /// passes when an object names a program not seen at init.
    pub fn compile_program(&self, name: &str) -> Result<Program, RenderError> {
        compile_program(self.gpu, self.shaders, self.shader_table, name)
    }
}

fn resolve_target<'a>(
    targets: &'a NamedRegistry<RenderTarget>,
    name: &str,
) -> Result<&'a RenderTarget, RenderError> {
    match targets.get(name) {
        Some(target) => Ok(target),
        None => {
            debug_assert!(false, "render target not registered: {name}");
            Err(RenderError::TargetNotFound {
                name: name.to_string(),
            })
        }
    }
}

fn compile_program(
    gpu: &Gpu,
    shaders: &ShaderCatalog,
    shader_table: &NamedRegistry<ProgramDef>,
    name: &str,
) -> Result<Program, RenderError> {
    if let Some(def) = shader_table.get(name) {
        validate_wgsl(name, &def.source)?;
        return Ok(Program::new(name.to_string(), gpu, def.clone()));
    }
    shaders.compile(name, gpu)
}
