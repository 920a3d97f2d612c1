//! Logging utilities.
//!
//! Engine code only talks to the `log` facade; this module wires up
//! `env_logger` for binaries.

mod init;

pub use init::{init_logging, LoggingConfig};
