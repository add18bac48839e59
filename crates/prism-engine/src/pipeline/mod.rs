//! Pipeline orchestration.
//!
//! A [`RenderPipeline`] owns an ordered pass sequence, the named render
//! targets those passes communicate through, and the catalogs injected at
//! construction. Pipelines initialize exactly once and render one frame at a
//! time; the host swaps between whole pipelines, never mutates a running one.

mod presets;

pub(crate) mod registry;

pub use presets::{depth_pipeline, forward_pipeline, post_process_pipeline};

use std::sync::Arc;

use crate::compute::KernelCatalog;
use crate::device::{Frame, Gpu, SurfaceInfo};
use crate::pass::{PassInitCtx, PassRenderCtx, PassSequence, RenderPass};
use crate::scene::Scene;
use crate::shader::{ProgramDef, ShaderCatalog};
use crate::target::{RenderTarget, TargetSpec};
use crate::RenderError;

use registry::NamedRegistry;

/// Name under which the host surface is always registered.
pub const SCREEN_TARGET: &str = "screen";

pub struct RenderPipeline {
    gpu: Arc<Gpu>,
    surface: SurfaceInfo,
    shaders: ShaderCatalog,
    kernels: KernelCatalog,
    declared: Vec<(String, TargetSpec)>,
    targets: NamedRegistry<RenderTarget>,
    shader_table: NamedRegistry<ProgramDef>,
    passes: PassSequence<Box<dyn RenderPass>>,
}

impl RenderPipeline {
    pub fn new(
        gpu: Arc<Gpu>,
        surface: SurfaceInfo,
        shaders: ShaderCatalog,
        kernels: KernelCatalog,
    ) -> Self {
        Self {
            gpu,
            surface,
            shaders,
            kernels,
            declared: Vec::new(),
            targets: NamedRegistry::new(),
            shader_table: NamedRegistry::new(),
            passes: PassSequence::new(),
        }
    }

    /// Queues an offscreen target for allocation at [`RenderPipeline::init`].
    pub fn declare_target(&mut self, name: impl Into<String>, spec: TargetSpec) {
        self.declared.push((name.into(), spec));
    }

    /// Appends a pass; execution order is insertion order, never reordered.
    pub fn add_pass(&mut self, pass: Box<dyn RenderPass>) {
        self.passes.push(pass);
    }

    /// Registers an already-built target, e.g. one the host owns.
    pub fn add_render_target(
        &mut self,
        name: impl Into<String>,
        target: RenderTarget,
    ) -> Result<(), RenderError> {
        let name = name.into();
        if !self.targets.insert(name.clone(), target) {
            return Err(RenderError::DuplicateTarget { name });
        }
        Ok(())
    }

    /// Resolves a registered target. A miss after init is a configuration
    /// error in the pipeline's wiring.
    pub fn render_target(&self, name: &str) -> Result<&RenderTarget, RenderError> {
        match self.targets.get(name) {
            Some(target) => Ok(target),
            None => {
                debug_assert!(false, "render target not registered: {name}");
                Err(RenderError::TargetNotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Adds a pipeline-local program definition. Local names shadow the
    /// injected catalog when passes compile programs.
    pub fn add_shader(
        &mut self,
        name: impl Into<String>,
        def: ProgramDef,
    ) -> Result<(), RenderError> {
        let name = name.into();
        if !self.shader_table.insert(name.clone(), def) {
            return Err(RenderError::DuplicateShader { name });
        }
        Ok(())
    }

    pub fn shader(&self, name: &str) -> Option<&ProgramDef> {
        self.shader_table.get(name)
    }

    pub fn surface(&self) -> &SurfaceInfo {
        &self.surface
    }

    pub fn gpu(&self) -> &Arc<Gpu> {
        &self.gpu
    }

    /// Allocates declared targets, registers the `"screen"` surface and
    /// initializes every pass in insertion order. Runs exactly once; the
    /// first failure aborts and leaves later passes uninitialized.
    pub fn init(&mut self) -> Result<(), RenderError> {
        if self.passes.is_initialized() {
            return Err(RenderError::AlreadyInitialized {
                what: "render pipeline".to_string(),
            });
        }

        let declared = std::mem::take(&mut self.declared);
        for (name, spec) in declared {
            log::debug!("allocating render target '{name}' ({}x{})", spec.width, spec.height);
            let target = RenderTarget::offscreen(&self.gpu, spec);
            self.add_render_target(name, target)?;
        }
        self.add_render_target(SCREEN_TARGET, RenderTarget::surface(self.surface))?;

        let Self {
            gpu,
            surface,
            shaders,
            kernels,
            targets,
            shader_table,
            passes,
            ..
        } = self;
        passes.init_all(|pass| {
            log::debug!("initializing pass '{}'", pass.name());
            let mut ctx = PassInitCtx {
                gpu: &**gpu,
                targets: &*targets,
                shaders: &*shaders,
                shader_table: &*shader_table,
                kernels: &*kernels,
                surface: &*surface,
            };
            pass.init(&mut ctx)
        })
    }

    /// Renders one frame: every pass in insertion order, first failure
    /// aborts the frame. The caller owns frame submission.
    pub fn render(
        &mut self,
        scene: &mut dyn Scene,
        frame: &mut Frame,
    ) -> Result<(), RenderError> {
        let Self {
            gpu,
            surface,
            shaders,
            targets,
            shader_table,
            passes,
            ..
        } = self;
        passes.render_all(|pass| {
            let mut ctx = PassRenderCtx {
                gpu: &**gpu,
                targets: &*targets,
                shaders: &*shaders,
                shader_table: &*shader_table,
                surface: &*surface,
                frame: &mut *frame,
                scene: &mut *scene,
            };
            pass.render(&mut ctx)
        })
    }
}
