//! Logging setup.
//!
//! Library code only uses the `log` facade; binaries call [`init_logging`]
//! once at startup to install `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
