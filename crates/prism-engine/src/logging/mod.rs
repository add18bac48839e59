//! Logging utilities.
//!
//! This module centralizes logger initialization. Library code logs through
//! the `log` facade only; the backend is chosen by the host.

mod init;

pub use init::{init_logging, LoggingConfig};
