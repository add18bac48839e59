use std::collections::HashMap;

use crate::device::Gpu;

/// Default value for a declared program uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

/// A vertex+fragment program definition.
///
/// `source` is one WGSL module exposing `vs_main` and `fs_main`. Uniform
/// defaults and sampler slot names are declared so passes can bind inputs by
/// name without inspecting the source.
#[derive(Debug, Clone)]
pub struct ProgramDef {
    pub source: String,
    pub uniforms: HashMap<String, UniformValue>,
    pub samplers: Vec<String>,
}

impl ProgramDef {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            uniforms: HashMap::new(),
            samplers: Vec::new(),
        }
    }

    pub fn with_uniform(mut self, name: &str, value: UniformValue) -> Self {
        self.uniforms.insert(name.to_string(), value);
        self
    }

    pub fn with_sampler(mut self, name: &str) -> Self {
        self.samplers.push(name.to_string());
        self
    }
}

/// A compiled program handle. Immutable after creation.
pub struct Program {
    name: String,
    module: wgpu::ShaderModule,
    def: ProgramDef,
}

impl Program {
    pub(crate) fn new(name: String, gpu: &Gpu, def: ProgramDef) -> Self {
        // Source is naga-validated by the catalog before we get here.
        let module = gpu
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&name),
                source: wgpu::ShaderSource::Wgsl(def.source.as_str().into()),
            });

        Self { name, module, def }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn def(&self) -> &ProgramDef {
        &self.def
    }

    /// Declared default for `uniform`, if any.
    pub fn uniform_default(&self, uniform: &str) -> Option<UniformValue> {
        self.def.uniforms.get(uniform).copied()
    }
}
