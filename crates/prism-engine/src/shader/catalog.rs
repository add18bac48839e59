use std::collections::HashMap;

use crate::device::Gpu;
use crate::RenderError;

use super::{validate_wgsl, Program, ProgramDef, UniformValue};

/// Program used by forward passes when an object names no other.
pub const FORWARD: &str = "forward";
/// Depth-as-color encoding program used by the depth-encode pass.
pub const DEPTH_ENCODE: &str = "depth_encode";
/// Full-screen textured-quad program used by the blit pass.
pub const DRAW_TEXTURE: &str = "draw_texture";

/// Program catalog, injected into pipeline construction.
///
/// Registration is last-wins by name so sources can be re-registered during
/// development; compiled pipelines pick the change up on their next init.
pub struct ShaderCatalog {
    defs: HashMap<String, ProgramDef>,
}

impl ShaderCatalog {
    pub fn new() -> Self {
        Self {
            defs: HashMap::new(),
        }
    }

    /// Catalog pre-populated with the built-in programs.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();

        catalog.register(
            FORWARD,
            ProgramDef::from_source(include_str!("wgsl/forward.wgsl")),
        );
        catalog.register(
            DEPTH_ENCODE,
            ProgramDef::from_source(include_str!("wgsl/depth_encode.wgsl")),
        );
        catalog.register(
            DRAW_TEXTURE,
            ProgramDef::from_source(include_str!("wgsl/draw_texture.wgsl"))
                .with_uniform("canvas_size", UniformValue::Vec2([512.0, 512.0]))
                .with_sampler("input_texture"),
        );

        catalog
    }

    /// Registers `def` under `name`. The last registration for a name wins.
    pub fn register(&mut self, name: &str, def: ProgramDef) {
        if self.defs.insert(name.to_string(), def).is_some() {
            log::debug!("shader '{name}' re-registered, last definition wins");
        }
    }

    pub fn def(&self, name: &str) -> Option<&ProgramDef> {
        self.defs.get(name)
    }

    /// Validates the named source on the CPU without touching the device.
    pub fn validate(&self, name: &str) -> Result<(), RenderError> {
        let def = self.defs.get(name).ok_or_else(|| RenderError::ShaderNotFound {
            name: name.to_string(),
        })?;
        validate_wgsl(name, &def.source)
    }

    /// Validates and compiles the named program.
    ///
    /// A compile failure here must propagate to pipeline init and abort it;
    /// a broken shader means the pipeline is unusable.
    pub fn compile(&self, name: &str, gpu: &Gpu) -> Result<Program, RenderError> {
        self.validate(name)?;
        let def = self.defs.get(name).ok_or_else(|| RenderError::ShaderNotFound {
            name: name.to_string(),
        })?;
        Ok(Program::new(name.to_string(), gpu, def.clone()))
    }
}

impl Default for ShaderCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_validate() {
        let catalog = ShaderCatalog::with_builtins();
        for name in [FORWARD, DEPTH_ENCODE, DRAW_TEXTURE] {
            catalog.validate(name).unwrap();
        }
    }

    #[test]
    fn last_registration_wins() {
        let mut catalog = ShaderCatalog::new();
        catalog.register("p", ProgramDef::from_source("first"));
        catalog.register("p", ProgramDef::from_source("second"));
        assert_eq!(catalog.def("p").unwrap().source, "second");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let catalog = ShaderCatalog::new();
        assert!(matches!(
            catalog.validate("ghost"),
            Err(RenderError::ShaderNotFound { .. })
        ));
    }

    #[test]
    fn broken_source_fails_validation() {
        let mut catalog = ShaderCatalog::new();
        catalog.register("broken", ProgramDef::from_source("@@@"));
        assert!(matches!(
            catalog.validate("broken"),
            Err(RenderError::Compile { .. })
        ));
    }

    #[test]
    fn draw_texture_declares_its_bindings() {
        let catalog = ShaderCatalog::with_builtins();
        let def = catalog.def(DRAW_TEXTURE).unwrap();
        assert_eq!(
            def.uniforms.get("canvas_size"),
            Some(&UniformValue::Vec2([512.0, 512.0]))
        );
        assert_eq!(def.samplers, vec!["input_texture".to_string()]);
    }
}
