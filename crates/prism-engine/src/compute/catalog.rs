use std::collections::HashMap;

use crate::device::Gpu;
use crate::shader::validate_wgsl;
use crate::RenderError;

use super::{ComputeKernel, KernelDef};

/// Luminance-weighted grayscale (0.30 r + 0.59 g + 0.11 b).
pub const DESATURATE: &str = "desaturate";
/// Red-channel threshold: values at or below 150 drop to black.
pub const THRESHOLD: &str = "threshold";
/// Per-channel color inversion.
pub const INVERT: &str = "invert";

/// Kernel catalog, injected into pipeline construction.
///
/// Same contract as the shader catalog: last registration for a name wins,
/// validation happens on the CPU, compile failures abort the owning pass's
/// init with build-log detail.
pub struct KernelCatalog {
    defs: HashMap<String, KernelDef>,
}

impl KernelCatalog {
    pub fn new() -> Self {
        Self {
            defs: HashMap::new(),
        }
    }

    /// Catalog pre-populated with the built-in image kernels.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(
            DESATURATE,
            KernelDef::from_source(include_str!("wgsl/desaturate.wgsl")),
        );
        catalog.register(
            THRESHOLD,
            KernelDef::from_source(include_str!("wgsl/threshold.wgsl")),
        );
        catalog.register(
            INVERT,
            KernelDef::from_source(include_str!("wgsl/invert.wgsl")),
        );
        catalog
    }

    /// Registers `def` under `name`. The last registration for a name wins.
    pub fn register(&mut self, name: &str, def: KernelDef) {
        if self.defs.insert(name.to_string(), def).is_some() {
            log::debug!("kernel '{name}' re-registered, last definition wins");
        }
    }

    pub fn def(&self, name: &str) -> Option<&KernelDef> {
        self.defs.get(name)
    }

    /// Validates the named source on the CPU without touching the device.
    pub fn validate(&self, name: &str) -> Result<(), RenderError> {
        let def = self.defs.get(name).ok_or_else(|| RenderError::KernelNotFound {
            name: name.to_string(),
        })?;
        validate_wgsl(name, &def.source)
    }

    /// Validates and compiles the named kernel.
    pub fn compile(&self, name: &str, gpu: &Gpu) -> Result<ComputeKernel, RenderError> {
        self.validate(name)?;
        let def = self.defs.get(name).ok_or_else(|| RenderError::KernelNotFound {
            name: name.to_string(),
        })?;
        Ok(ComputeKernel::new(name.to_string(), gpu, def))
    }
}

impl Default for KernelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_validate() {
        let catalog = KernelCatalog::with_builtins();
        for name in [DESATURATE, THRESHOLD, INVERT] {
            catalog.validate(name).unwrap();
        }
    }

    #[test]
    fn unknown_kernel_is_not_found() {
        let catalog = KernelCatalog::new();
        assert!(matches!(
            catalog.validate("ghost"),
            Err(RenderError::KernelNotFound { .. })
        ));
    }

    #[test]
    fn broken_kernel_source_fails_validation() {
        let mut catalog = KernelCatalog::new();
        catalog.register("broken", KernelDef::from_source("@compute fn ("));
        assert!(matches!(
            catalog.validate("broken"),
            Err(RenderError::Compile { .. })
        ));
    }
}
