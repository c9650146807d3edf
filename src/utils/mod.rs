//! Shared utilities: logging, progress reporting and test support

pub mod logging;
pub mod test;
