//! Progress reporting for batch runs over many documents, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};

/// Style for the per-batch document progress bar
pub const DOCUMENT_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} documents {msg}";

/// Create the document progress bar
///
/// # Arguments
/// * `documents` - Number of documents in the batch
/// * `description` - Optional description to display as the initial message
#[must_use]
pub fn create_document_progress_bar(documents: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(documents);
    match ProgressStyle::default_bar().template(DOCUMENT_TEMPLATE) {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => log::debug!("Falling back to default progress style: {e}"),
    }

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Finish a progress bar with a completion message
///
/// # Arguments
/// * `pb` - The `ProgressBar` to finish
/// * `message` - Optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
