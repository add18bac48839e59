//! Prism engine crate.
//!
//! A runtime-swappable rendering pipeline built from ordered, named passes
//! that communicate exclusively through named render targets. One pass class
//! offloads per-pixel work to a compute kernel dispatched over a 2-D grid.
//!
//! The crate consumes two host collaborators: a [`scene::Scene`] (visible
//! objects + matrices) and a [`device::Gpu`] (command submission, shader
//! compilation, buffer allocation). It exposes pipeline construction,
//! one-shot initialization and per-frame execution, plus the active-pipeline
//! swap on [`host::PipelineHost`].

pub mod compute;
pub mod device;
pub mod host;
pub mod pass;
pub mod pipeline;
pub mod scene;
pub mod shader;
pub mod target;

pub mod logging;

mod error;

pub use error::RenderError;
