//! Writers for consolidated tables
//!
//! One file per document: TSV with a `Test/Date` corner cell and ISO date
//! columns, or JSON shaped `{test: {date: value}}`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::error::{LabExtractError, Result};
use crate::models::ResultTable;

/// Header of the row-label column
pub const INDEX_LABEL: &str = "Test/Date";

/// Replace characters that would break a TSV cell
fn tsv_cell(value: &str) -> String {
    value
        .split(['\t', '\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write a table as tab separated values
pub fn write_tsv<W: Write>(table: &ResultTable, mut out: W) -> std::io::Result<()> {
    let mut header = vec![INDEX_LABEL.to_string()];
    header.extend(table.iso_dates());
    writeln!(out, "{}", header.join("\t"))?;

    for (test, cells) in table.rows() {
        let mut row = vec![tsv_cell(test)];
        row.extend(cells.iter().map(|cell| tsv_cell(&cell.render())));
        writeln!(out, "{}", row.join("\t"))?;
    }
    out.flush()
}

/// Write a table as pretty-printed JSON
pub fn write_json<W: Write>(table: &ResultTable, out: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, table)
}

/// File written for a document
#[must_use]
pub fn output_path(dir: &Path, document_id: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{document_id}.{}", format.extension()))
}

/// Write a document's table into `dir`, returning the file path
pub fn write_table(
    table: &ResultTable,
    dir: &Path,
    document_id: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    let path = output_path(dir, document_id, format);
    let file = File::create(&path)
        .map_err(|e| LabExtractError::io(&path, "Failed to create output file", e))?;
    let writer = BufWriter::new(file);

    match format {
        OutputFormat::Tsv => write_tsv(table, writer)
            .map_err(|e| LabExtractError::io(&path, "Failed to write table", e))?,
        OutputFormat::Json => write_json(table, writer)
            .map_err(|e| LabExtractError::io(&path, "Failed to write table", e.into()))?,
    }

    Ok(path)
}
