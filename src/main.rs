use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use lab_extract::config::DateFormatConfig;
use lab_extract::utils::date_utils::{ISO_FORMAT, require_date};
use lab_extract::{Extractor, ExtractorConfig, OutputFormat, Passes, process_folder};
use log::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Line scan under "Date collected" declarations
    Lines,
    /// Full blood count panels and episode sections
    Panels,
    /// Every pass
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Tsv,
    Json,
}

/// Extract laboratory results from exported report text files
#[derive(Debug, Parser)]
#[command(name = "lab-extract", version, about)]
struct Cli {
    /// Folder containing one `.txt` report per patient
    input: PathBuf,
    /// Folder receiving one table per patient
    output: PathBuf,
    /// Which scanning passes to run
    #[arg(long, value_enum, default_value = "lines")]
    mode: Mode,
    /// Output table format
    #[arg(long, value_enum, default_value = "tsv")]
    format: Format,
    /// Drop misaligned panel rows instead of failing the document
    #[arg(long)]
    lenient_panels: bool,
    /// Earliest collection date kept (dd/mm/yyyy or YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date)]
    from: Option<NaiveDate>,
    /// Latest collection date kept (dd/mm/yyyy or YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date)]
    to: Option<NaiveDate>,
    /// Extra panel row to keep, in addition to the full blood count set (repeatable)
    #[arg(long = "panel-test", value_name = "NAME")]
    panel_tests: Vec<String>,
    /// Worker threads (defaults to LAB_EXTRACT_THREADS or one per CPU)
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    require_date(s, &DateFormatConfig::default())
        .or_else(|e| NaiveDate::parse_from_str(s, ISO_FORMAT).map_err(|_| e.to_string()))
}

impl Cli {
    fn config(&self) -> ExtractorConfig {
        let passes = match self.mode {
            Mode::Lines => Passes::lines(),
            Mode::Panels => Passes::panels(),
            Mode::All => Passes::all(),
        };
        let format = match self.format {
            Format::Tsv => OutputFormat::Tsv,
            Format::Json => OutputFormat::Json,
        };

        let mut config = ExtractorConfig::new()
            .with_passes(passes)
            .with_output_format(format);
        if self.lenient_panels {
            config = config.lenient_panels();
        }
        if let Some(from) = self.from {
            config = config.with_start_date(from);
        }
        if let Some(to) = self.to {
            config = config.with_end_date(to);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        for test in &self.panel_tests {
            config.add_panel_test(test);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let extractor = Extractor::new(cli.config()).context("Invalid extraction configuration")?;

    let summary = process_folder(&extractor, &cli.input, &cli.output)
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    info!(
        "Extraction completed: {} written, {} without results, {} failed",
        summary.written.len(),
        summary.empty.len(),
        summary.failed.len()
    );
    for (id, reason) in &summary.failed {
        log::error!("{id}: {reason}");
    }
    Ok(())
}
