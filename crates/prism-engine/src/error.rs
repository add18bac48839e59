use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Classes map to how failures are surfaced:
/// - configuration errors (unknown or duplicate resource names) abort
///   pipeline init and are programmer errors,
/// - compile errors abort the owning pass's init and carry build-log detail,
/// - `DeviceUnavailable` is fatal at device-context construction,
/// - `Device` is a transient per-frame failure, propagated without retry.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render target not registered: {name}")]
    TargetNotFound { name: String },

    #[error("duplicate render target name: {name}")]
    DuplicateTarget { name: String },

    #[error("shader not registered: {name}")]
    ShaderNotFound { name: String },

    #[error("duplicate shader name: {name}")]
    DuplicateShader { name: String },

    #[error("compute kernel not registered: {name}")]
    KernelNotFound { name: String },

    #[error("pass input '{input}' is not mapped to a render target")]
    MissingInput { input: String },

    #[error("'{name}' failed to compile:\n{log}")]
    Compile { name: String, log: String },

    #[error("no compatible device: {reason}")]
    DeviceUnavailable { reason: String },

    #[error("device error: {context}")]
    Device { context: String },

    #[error("{what} is already initialized")]
    AlreadyInitialized { what: String },

    #[error("{what} has not been initialized")]
    NotInitialized { what: String },
}

impl RenderError {
    pub(crate) fn device(context: impl Into<String>) -> Self {
        Self::Device { context: context.into() }
    }
}
