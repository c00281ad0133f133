//! Log lines shared by batch runs.

use std::path::Path;
use std::time::Duration;

/// Announce a batch over `folder`
pub fn log_operation_start(operation: &str, folder: &Path) {
    log::info!("{operation} {}", folder.display());
}

/// Summarise a finished batch
pub fn log_operation_complete(
    operation: &str,
    output_dir: &Path,
    documents: usize,
    elapsed: Duration,
) {
    log::info!(
        "{operation} {documents} documents into {} in {elapsed:?}",
        output_dir.display()
    );
}

/// A document produced no table
pub fn log_document_skipped(document: &str, reason: &str) {
    log::warn!("Skipping {document}: {reason}");
}

pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
