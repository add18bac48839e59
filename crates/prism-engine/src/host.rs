//! Runtime pipeline swap.
//!
//! The host keeps two fully-built pipelines and flips which one renders.
//! Swapping is a flag flip with no drain of in-flight device work; both
//! pipelines stay initialized, so the flip costs nothing at frame time.

/// Which of the host's two pipelines renders the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineSlot {
    Active,
    Alternate,
}

impl PipelineSlot {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Alternate,
            Self::Alternate => Self::Active,
        }
    }
}

/// Owns a pipeline pair plus the slot flag. Exactly one pipeline executes
/// per frame.
///
/// Generic over the pipeline handle so the swap contract needs no device.
pub struct PipelineHost<P> {
    primary: P,
    alternate: P,
    slot: PipelineSlot,
}

impl<P> PipelineHost<P> {
    /// Starts with `primary` active.
    pub fn new(primary: P, alternate: P) -> Self {
        Self {
            primary,
            alternate,
            slot: PipelineSlot::Active,
        }
    }

    pub fn slot(&self) -> PipelineSlot {
        self.slot
    }

    pub fn active(&self) -> &P {
        match self.slot {
            PipelineSlot::Active => &self.primary,
            PipelineSlot::Alternate => &self.alternate,
        }
    }

    pub fn active_mut(&mut self) -> &mut P {
        match self.slot {
            PipelineSlot::Active => &mut self.primary,
            PipelineSlot::Alternate => &mut self.alternate,
        }
    }

    /// Flips which pipeline renders, starting with the next frame.
    pub fn toggle(&mut self) -> PipelineSlot {
        self.slot = self.slot.toggled();
        log::info!("pipeline swapped to {:?}", self.slot);
        self.slot
    }

    pub fn set_active(&mut self, slot: PipelineSlot) {
        self.slot = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_has_period_two() {
        let slot = PipelineSlot::Active;
        assert_eq!(slot.toggled().toggled(), slot);
    }

    #[test]
    fn even_toggles_return_to_the_primary() {
        let mut host = PipelineHost::new("post_process", "forward");
        for _ in 0..4 {
            host.toggle();
        }
        assert_eq!(*host.active(), "post_process");
        assert_eq!(host.slot(), PipelineSlot::Active);
    }

    #[test]
    fn odd_toggles_land_on_the_alternate() {
        let mut host = PipelineHost::new("post_process", "forward");
        for _ in 0..7 {
            host.toggle();
        }
        assert_eq!(*host.active(), "forward");
        assert_eq!(host.slot(), PipelineSlot::Alternate);
    }

    #[test]
    fn set_active_is_absolute() {
        let mut host = PipelineHost::new(1, 2);
        host.set_active(PipelineSlot::Alternate);
        assert_eq!(*host.active(), 2);
        host.set_active(PipelineSlot::Alternate);
        assert_eq!(*host.active(), 2);
    }

    #[test]
    fn active_mut_tracks_the_slot() {
        let mut host = PipelineHost::new(0u32, 0u32);
        *host.active_mut() += 1;
        host.toggle();
        *host.active_mut() += 10;
        assert_eq!(*host.active(), 10);
        host.toggle();
        assert_eq!(*host.active(), 1);
    }
}
