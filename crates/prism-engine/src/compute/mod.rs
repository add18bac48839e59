//! Compute offload: kernels, device buffers, dispatch and readback.
//!
//! Kernels are image-processing programs dispatched over a tiled 2-D index
//! space with a fixed argument layout: input pixel buffer, output pixel
//! buffer, image width, image height. Pixels travel device → host → device
//! buffer → kernel → host; the blocking finish barrier at the end is the
//! only cross-pass ordering guarantee involving the compute device.

mod buffers;
mod catalog;
mod grid;
mod kernel;
mod readback;

pub use buffers::KernelBuffers;
pub use catalog::{KernelCatalog, DESATURATE, INVERT, THRESHOLD};
pub use grid::{DispatchGrid, WORKGROUP_SIZE};
pub use kernel::{ComputeKernel, KernelDef};

pub(crate) use readback::{block_on_map, read_texture_rgba8};
