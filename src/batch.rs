//! Folder-level batch processing
//!
//! Every report file in a folder is one document. Documents share no state,
//! so they are processed in parallel on a dedicated rayon pool; a document
//! that yields nothing or fails is logged and counted while the rest of the
//! batch continues.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::error::util::{safe_read_lossy, validate_directory};
use crate::error::{LabExtractError, Result};
use crate::export::write_table;
use crate::pipeline::Extractor;
use crate::utils::io::{document_id, find_report_files};
use crate::utils::logging::{
    create_document_progress_bar, finish_progress_bar, log_document_skipped,
    log_operation_complete, log_operation_start, log_warning,
};

/// What happened to one document
#[derive(Debug)]
pub enum DocumentOutcome {
    /// A table was written to this path
    Written(PathBuf),
    /// No observation was found
    Empty,
    /// Reading, extraction or writing failed
    Failed(LabExtractError),
}

/// Totals for a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files written
    pub written: Vec<PathBuf>,
    /// Documents without results
    pub empty: Vec<String>,
    /// Documents that failed, with the error message
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    /// Number of documents visited
    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.empty.len() + self.failed.len()
    }

    fn record(&mut self, id: String, outcome: DocumentOutcome) {
        match outcome {
            DocumentOutcome::Written(path) => self.written.push(path),
            DocumentOutcome::Empty => self.empty.push(id),
            DocumentOutcome::Failed(e) => self.failed.push((id, e.to_string())),
        }
    }
}

/// Read, extract and write one report file
pub fn process_file(extractor: &Extractor, path: &Path, output_dir: &Path) -> DocumentOutcome {
    let id = document_id(path);
    let result = safe_read_lossy(path, "extracting lab results")
        .and_then(|text| extractor.process_document(&id, &text))
        .and_then(|doc| {
            write_table(
                &doc.table,
                output_dir,
                &doc.id,
                extractor.config().output_format,
            )
        });

    match result {
        Ok(written) => DocumentOutcome::Written(written),
        Err(e) if e.is_empty_extraction() => {
            log_document_skipped(&id, "no matching results");
            DocumentOutcome::Empty
        }
        Err(e) => {
            log_document_skipped(&id, &e.to_string());
            DocumentOutcome::Failed(e)
        }
    }
}

/// Process every report in `input_dir`, writing one table per document to `output_dir`
pub fn process_folder(
    extractor: &Extractor,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary> {
    let start = Instant::now();
    log_operation_start("Extracting lab results from", input_dir);

    let files = find_report_files(input_dir)?;
    if files.is_empty() {
        log_warning("No report files found", Some(input_dir));
        return Ok(BatchSummary::default());
    }

    std::fs::create_dir_all(output_dir)
        .map_err(|e| LabExtractError::io(output_dir, "Failed to create output directory", e))?;
    validate_directory(output_dir, "writing tables")?;

    let threads = extractor.config().effective_threads();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| LabExtractError::Other(anyhow::anyhow!("Failed to build thread pool: {e}")))?;
    log::info!("Processing {} documents on {threads} threads", files.len());

    let pb = create_document_progress_bar(files.len() as u64, Some("extracting"));
    let outcomes: Vec<(String, DocumentOutcome)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let outcome = process_file(extractor, path, output_dir);
                pb.inc(1);
                (document_id(path), outcome)
            })
            .collect()
    });
    finish_progress_bar(&pb, Some("done"));

    let mut summary = BatchSummary::default();
    for (id, outcome) in outcomes {
        summary.record(id, outcome);
    }

    log_operation_complete(
        "Extracted",
        output_dir,
        summary.written.len(),
        start.elapsed(),
    );
    if !summary.empty.is_empty() || !summary.failed.is_empty() {
        log::warn!(
            "{} documents without results, {} failed",
            summary.empty.len(),
            summary.failed.len()
        );
    }

    Ok(summary)
}
