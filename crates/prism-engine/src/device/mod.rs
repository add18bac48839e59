//! GPU device context.
//!
//! This module is responsible for:
//! - enumerating adapters and selecting one (preferred-substring policy)
//! - creating the wgpu Device/Queue
//! - per-frame command recording (`Frame`) and mid-frame flushes
//!
//! The output surface itself is owned by the host; the core only receives a
//! [`SurfaceInfo`] description and a per-frame color view.

mod frame;
mod gpu;
mod init;

pub use frame::Frame;
pub use gpu::Gpu;
pub use init::{DeviceInit, SurfaceInfo};
