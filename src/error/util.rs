//! Utility functions for error handling
//!
//! File access helpers that attach the path and the purpose of the
//! operation to any failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{LabExtractError, Result};

/// Check if a directory exists and is readable, with rich error information
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(LabExtractError::Path {
            path: path.to_path_buf(),
            message: format!("Directory not found (needed for: {purpose})"),
        });
    }

    if !path.is_dir() {
        return Err(LabExtractError::Path {
            path: path.to_path_buf(),
            message: format!("Path is not a directory (expected for: {purpose})"),
        });
    }

    match fs::read_dir(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check directory permissions".to_string()
                }
                _ => format!("Failed to access directory for: {purpose}"),
            };
            Err(LabExtractError::io(path, context, e))
        }
    }
}

/// Read a text file, dropping any bytes that are not valid UTF-8
///
/// Exported reports occasionally carry stray bytes from the source system.
/// Those are removed instead of failing the whole document.
pub fn safe_read_lossy(path: &Path, purpose: &str) -> Result<String> {
    if !path.is_file() {
        return Err(LabExtractError::Path {
            path: path.to_path_buf(),
            message: format!("Expected a file for: {purpose}"),
        });
    }

    let bytes = fs::read(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "Permission denied - check file permissions".to_string(),
            io::ErrorKind::NotFound => {
                "File not found - it may have been deleted during operation".to_string()
            }
            _ => format!("Failed to read file content for: {purpose}"),
        };
        LabExtractError::io(path, context, e)
    })?;

    Ok(decode_lossy(&bytes))
}

/// Decode bytes as UTF-8, dropping undecodable sequences
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}
