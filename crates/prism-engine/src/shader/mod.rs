//! Shader programs and their catalog.
//!
//! Program definitions live in an explicit [`ShaderCatalog`] injected into
//! pipeline construction (no process-global table). Definitions are WGSL
//! modules with a `vs_main`/`fs_main` pair plus declared uniform defaults
//! and sampler slots; compiled [`Program`] handles are immutable.

mod catalog;
mod program;
mod validate;

pub use catalog::{ShaderCatalog, DEPTH_ENCODE, DRAW_TEXTURE, FORWARD};
pub use program::{Program, ProgramDef, UniformValue};

pub(crate) use validate::validate_wgsl;
