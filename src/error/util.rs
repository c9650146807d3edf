//! Utility functions for error handling
//!
//! Thin wrappers over `std::fs` that attach the offending path to I/O errors.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{KeywordError, Result};

/// Open a file for reading, reporting the path on failure
pub fn open_file(path: &Path) -> Result<fs::File> {
    if !path.is_file() {
        return Err(KeywordError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "file not found or not a regular file"),
        ));
    }

    fs::File::open(path).map_err(|e| KeywordError::io(path, e))
}

/// Create (or truncate) a file for writing, reporting the path on failure
pub fn create_file(path: &Path) -> Result<fs::File> {
    fs::File::create(path).map_err(|e| KeywordError::io(path, e))
}

/// Check that a directory exists and is readable
pub fn validate_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(KeywordError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "directory not found"),
        ));
    }

    fs::read_dir(path)
        .map(|_| ())
        .map_err(|e| KeywordError::io(path, e))
}

/// Create a directory and all of its parents
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(KeywordError::io(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
        ));
    }

    fs::create_dir_all(path).map_err(|e| KeywordError::io(path, e))
}
