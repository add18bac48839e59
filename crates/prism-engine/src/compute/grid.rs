/// Fixed 2-D work-group (tile) shape: 16 items along width, 4 along height.
pub const WORKGROUP_SIZE: (u32, u32) = (16, 4);

/// 2-D dispatch domain for an image-processing kernel.
///
/// The global size per dimension is `ceil(extent / local) * local`, so the
/// grid always covers the full image even when its dimensions are not
/// multiples of the tile size. Kernels guard the over-provisioned threads
/// themselves (`if (index >= extent) return;`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchGrid {
    width: u32,
    height: u32,
}

impl DispatchGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total threads launched per dimension; always a multiple of the
    /// work-group size.
    pub fn global_size(&self) -> (u32, u32) {
        let (gx, gy) = self.workgroup_counts();
        (gx * WORKGROUP_SIZE.0, gy * WORKGROUP_SIZE.1)
    }

    /// Work-group counts passed to `dispatch_workgroups`.
    pub fn workgroup_counts(&self) -> (u32, u32) {
        (
            self.width.div_ceil(WORKGROUP_SIZE.0),
            self.height.div_ceil(WORKGROUP_SIZE.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_extents_round_up_to_full_tiles() {
        let grid = DispatchGrid::new(257, 130);
        assert_eq!(grid.global_size(), (272, 132));
        assert_eq!(grid.workgroup_counts(), (17, 33));
    }

    #[test]
    fn global_size_is_a_multiple_of_the_tile() {
        for (w, h) in [(1, 1), (16, 4), (257, 130), (1920, 1080)] {
            let (gx, gy) = DispatchGrid::new(w, h).global_size();
            assert_eq!(gx % WORKGROUP_SIZE.0, 0);
            assert_eq!(gy % WORKGROUP_SIZE.1, 0);
            assert!(gx >= w);
            assert!(gy >= h);
        }
    }

    #[test]
    fn exact_multiples_are_unchanged() {
        let grid = DispatchGrid::new(256, 128);
        assert_eq!(grid.global_size(), (256, 128));
    }
}
