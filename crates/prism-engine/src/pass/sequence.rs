use crate::RenderError;

/// Append-only ordered pass list owning the init/render lifecycle.
///
/// Generic over the pass handle and driven by closures so the state machine
/// stays testable without a device. The pipeline supplies closures that call
/// into the real pass trait with the right contexts.
pub struct PassSequence<P> {
    passes: Vec<P>,
    initialized: bool,
}

impl<P> PassSequence<P> {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            initialized: false,
        }
    }

    /// Appends a pass. Execution order is insertion order, always.
    pub fn push(&mut self, pass: P) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Initializes every pass in insertion order, stopping at the first
    /// failure; passes after a failed one stay uninitialized. Initializing
    /// twice is an error.
    pub fn init_all(
        &mut self,
        mut init: impl FnMut(&mut P) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        if self.initialized {
            return Err(RenderError::AlreadyInitialized {
                what: "pass sequence".to_string(),
            });
        }
        for pass in &mut self.passes {
            init(pass)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Runs every pass in insertion order; the first failure aborts the
    /// frame. Rendering before initialization is an error.
    pub fn render_all(
        &mut self,
        mut render: impl FnMut(&mut P) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized {
                what: "pass sequence".to_string(),
            });
        }
        for pass in &mut self.passes {
            render(pass)?;
        }
        Ok(())
    }
}

impl<P> Default for PassSequence<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPass {
        name: &'static str,
        fail_init: bool,
    }

    fn sequence(names: &[(&'static str, bool)]) -> PassSequence<MockPass> {
        let mut seq = PassSequence::new();
        for &(name, fail_init) in names {
            seq.push(MockPass { name, fail_init });
        }
        seq
    }

    #[test]
    fn init_and_render_run_in_insertion_order() {
        let mut seq = sequence(&[("scene", false), ("post", false), ("blit", false)]);
        let mut log = Vec::new();
        seq.init_all(|p| {
            log.push(format!("init {}", p.name));
            Ok(())
        })
        .unwrap();
        seq.render_all(|p| {
            log.push(format!("render {}", p.name));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            log,
            [
                "init scene",
                "init post",
                "init blit",
                "render scene",
                "render post",
                "render blit"
            ]
        );
    }

    #[test]
    fn init_failure_leaves_later_passes_untouched() {
        let mut seq = sequence(&[("scene", false), ("broken", true), ("blit", false)]);
        let mut initialized = Vec::new();
        let result = seq.init_all(|p| {
            if p.fail_init {
                return Err(RenderError::Compile {
                    name: p.name.to_string(),
                    log: "bad source".to_string(),
                });
            }
            initialized.push(p.name);
            Ok(())
        });
        assert!(matches!(result, Err(RenderError::Compile { .. })));
        assert_eq!(initialized, ["scene"]);
        assert!(!seq.is_initialized());
    }

    #[test]
    fn initializing_twice_is_rejected() {
        let mut seq = sequence(&[("scene", false)]);
        seq.init_all(|_| Ok(())).unwrap();
        assert!(matches!(
            seq.init_all(|_| Ok(())),
            Err(RenderError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn rendering_before_init_is_rejected() {
        let mut seq = sequence(&[("scene", false)]);
        assert!(matches!(
            seq.render_all(|_| Ok(())),
            Err(RenderError::NotInitialized { .. })
        ));
    }

    #[test]
    fn write_before_read_ordering_is_observable() {
        // A writer pass followed by a reader pass sharing one slot models
        // two passes communicating through a named target.
        let mut seq = sequence(&[("writer", false), ("reader", false)]);
        seq.init_all(|_| Ok(())).unwrap();

        let mut slot: Option<u32> = None;
        let mut read = None;
        seq.render_all(|p| {
            match p.name {
                "writer" => slot = Some(42),
                "reader" => read = slot,
                _ => unreachable!(),
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(read, Some(42));
    }
}
