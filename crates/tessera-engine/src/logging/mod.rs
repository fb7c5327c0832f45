//! Logging setup.
//!
//! Everything in the crate reports through the `log` facade; this module only
//! installs the `env_logger` backend and provides the abort path used for
//! unrecoverable errors.

mod fatal;
mod init;

pub use fatal::fatal;
pub use init::{init_logging, LoggingConfig};
