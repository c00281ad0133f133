//! Report file discovery

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::error::util::validate_directory;

/// Extension of exported report files
pub const REPORT_EXTENSION: &str = "txt";

/// All report files directly inside `dir`, sorted by name
pub fn find_report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    validate_directory(dir, "reading report files")?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| crate::error::LabExtractError::io(dir, "Failed to list report files", e))?
        .filter_map(|res: std::io::Result<std::fs::DirEntry>| res.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == REPORT_EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

/// Document identifier derived from a report path (the file stem)
#[must_use]
pub fn document_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
