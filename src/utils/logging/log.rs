//! Log lines for dataset file reads and writes

use std::path::Path;
use std::time::Duration;

/// Note that a data file is about to be read
pub fn log_file_read(path: &Path) {
    log::debug!("Reading {}", path.display());
}

/// Report how many rows of a dataset were loaded or saved at `path`
pub fn log_rows_done(action: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(elapsed) => log::info!("{action} {rows} rows at {} ({elapsed:.2?})", path.display()),
        None => log::info!("{action} {rows} rows at {}", path.display()),
    }
}

pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
