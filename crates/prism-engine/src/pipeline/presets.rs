//! Ready-made pipeline layouts.

use std::sync::Arc;

use crate::compute::{self, KernelCatalog};
use crate::device::{Gpu, SurfaceInfo};
use crate::pass::{BlitPass, ComputePass, DepthEncodePass, ForwardPass};
use crate::shader::ShaderCatalog;
use crate::target::TargetSpec;

use super::{RenderPipeline, SCREEN_TARGET};

const BACK_BUFFER: &str = "back_buffer";

/// Forward scene render, desaturate kernel over the back buffer, blit onto
/// the screen.
pub fn post_process_pipeline(gpu: Arc<Gpu>, surface: SurfaceInfo) -> RenderPipeline {
    let mut pipeline = RenderPipeline::new(
        gpu,
        surface,
        ShaderCatalog::with_builtins(),
        KernelCatalog::with_builtins(),
    );
    pipeline.declare_target(BACK_BUFFER, TargetSpec::back_buffer(&surface));
    pipeline.add_pass(Box::new(ForwardPass::new(BACK_BUFFER)));
    pipeline.add_pass(Box::new(ComputePass::new(
        BACK_BUFFER,
        BACK_BUFFER,
        compute::DESATURATE,
    )));
    pipeline.add_pass(Box::new(BlitPass::new(SCREEN_TARGET, BACK_BUFFER)));
    pipeline
}

/// Scene depth packed into the back buffer's color channels, blit onto the
/// screen.
pub fn depth_pipeline(gpu: Arc<Gpu>, surface: SurfaceInfo) -> RenderPipeline {
    let mut pipeline = RenderPipeline::new(
        gpu,
        surface,
        ShaderCatalog::with_builtins(),
        KernelCatalog::with_builtins(),
    );
    pipeline.declare_target(BACK_BUFFER, TargetSpec::back_buffer(&surface));
    pipeline.add_pass(Box::new(DepthEncodePass::new(BACK_BUFFER)));
    pipeline.add_pass(Box::new(BlitPass::new(SCREEN_TARGET, BACK_BUFFER)));
    pipeline
}

/// Plain forward render straight onto the screen.
pub fn forward_pipeline(gpu: Arc<Gpu>, surface: SurfaceInfo) -> RenderPipeline {
    let mut pipeline = RenderPipeline::new(
        gpu,
        surface,
        ShaderCatalog::with_builtins(),
        KernelCatalog::with_builtins(),
    );
    pipeline.add_pass(Box::new(ForwardPass::new(SCREEN_TARGET)));
    pipeline
}
