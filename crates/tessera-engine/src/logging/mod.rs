//! Logging utilities.
//!
//! Diagnostics go through the `log` facade and are initialised once with
//! `env_logger`. [`LogSink`] is the host side of the notification bridge: it
//! writes drained `Log` notifications as plain text lines.

mod init;
mod sink;

pub use init::{init_logging, LoggingConfig};
pub use sink::LogSink;
