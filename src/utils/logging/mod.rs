//! Logging utilities for output and progress tracking
//!
//! This module provides utilities for logging, console output, and progress tracking.

pub mod console;
pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use self::log::{log_file_read, log_rows_done, log_warning};
pub use progress::{create_main_progress_bar, create_spinner, finish_progress_bar};
