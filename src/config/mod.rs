//! Configuration for extraction runs.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::error::{LabExtractError, Result};

/// Environment variable overriding the number of worker threads
pub const THREADS_ENV: &str = "LAB_EXTRACT_THREADS";

/// Tests retained from full blood count panels
pub const DEFAULT_PANEL_TESTS: [&str; 7] = [
    "White Cell Count",
    "Red Cell Count",
    "Haemoglobin",
    "Haematocrit",
    "MCH",
    "MCV",
    "Platelet Count",
];

/// Configuration for date format handling
///
/// Collection dates are located in the text as `dd/mm/yyyy` tokens before
/// any format is tried, so only day-first slash formats apply here.
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing collection dates
    pub date_formats: Vec<String>,
}

/// Token every configured format must read as 31 January 2024
const DAY_FIRST_SAMPLE: &str = "31/01/2024";

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec!["%d/%m/%Y".to_string()], // Day first: 15/01/2023
        }
    }
}

impl DateFormatConfig {
    /// Reject formats that cannot read a `dd/mm/yyyy` token day first
    pub fn validate(&self) -> Result<()> {
        if self.date_formats.is_empty() {
            return Err(LabExtractError::Config(
                "no collection date formats configured".to_string(),
            ));
        }
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31);
        for format in &self.date_formats {
            if NaiveDate::parse_from_str(DAY_FIRST_SAMPLE, format).ok() != expected {
                return Err(LabExtractError::Config(format!(
                    "date format '{format}' does not read dd/mm/yyyy day first"
                )));
            }
        }
        Ok(())
    }
}

/// Which scanning passes run over a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passes {
    /// Line-by-line scan under the most recent collection date
    pub line_scan: bool,
    /// Episode-bounded section scan
    pub episode_scan: bool,
    /// Tab-delimited multi-date panel parse
    pub panel_scan: bool,
}

impl Passes {
    /// Only the line scanner
    #[must_use]
    pub const fn lines() -> Self {
        Self {
            line_scan: true,
            episode_scan: false,
            panel_scan: false,
        }
    }

    /// Panel parser and episode scanner
    #[must_use]
    pub const fn panels() -> Self {
        Self {
            line_scan: false,
            episode_scan: true,
            panel_scan: true,
        }
    }

    /// Every pass
    #[must_use]
    pub const fn all() -> Self {
        Self {
            line_scan: true,
            episode_scan: true,
            panel_scan: true,
        }
    }

    /// Whether no pass is enabled
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.line_scan || self.episode_scan || self.panel_scan)
    }
}

impl Default for Passes {
    fn default() -> Self {
        Self::lines()
    }
}

/// Output format for the batch writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tab separated, one row per test
    #[default]
    Tsv,
    /// `{test: {date: value}}`
    Json,
}

impl OutputFormat {
    /// File extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }
}

/// Configuration for extraction and consolidation
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Passes run by `process_document`
    pub passes: Passes,
    /// Raise on misaligned panel rows instead of dropping them
    pub strict_panel_alignment: bool,
    /// Start of the collection date window (inclusive)
    pub start_date: Option<NaiveDate>,
    /// End of the collection date window (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Accepted collection date formats
    pub date_format_config: DateFormatConfig,
    /// Test names retained from panels
    pub panel_tests: FxHashSet<String>,
    /// Worker threads for batch runs, `None` means one per CPU
    pub threads: Option<usize>,
    /// Format written by the batch writer
    pub output_format: OutputFormat,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            passes: Passes::default(),
            strict_panel_alignment: true,
            start_date: None,
            end_date: None,
            date_format_config: DateFormatConfig::default(),
            panel_tests: DEFAULT_PANEL_TESTS.iter().map(|t| (*t).to_string()).collect(),
            threads: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl ExtractorConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the passes to run
    #[must_use]
    pub fn with_passes(mut self, passes: Passes) -> Self {
        self.passes = passes;
        self
    }

    /// Drop misaligned panel rows with a warning instead of failing
    #[must_use]
    pub fn lenient_panels(mut self) -> Self {
        self.strict_panel_alignment = false;
        self
    }

    /// Set the date range for filtering
    #[must_use]
    pub fn with_date_range(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    /// Set the start date for filtering
    #[must_use]
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set the end date for filtering
    #[must_use]
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Set the number of worker threads
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the batch output format
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Add a test name to the panel allow-list
    pub fn add_panel_test(&mut self, test: &str) {
        self.panel_tests.insert(test.to_string());
    }

    /// Check if a date is within the configured range
    ///
    /// Returns true if:
    /// - No date range is configured, or
    /// - The date is within the configured range (inclusive)
    #[must_use]
    pub fn is_date_in_range(&self, date: &NaiveDate) -> bool {
        if let Some(start) = self.start_date {
            if *date < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if *date > end {
                return false;
            }
        }

        true
    }

    /// Worker threads, honouring the environment override
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        self.threads
            .or_else(threads_from_env)
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }

    /// Reject configurations that cannot produce a table
    pub fn validate(&self) -> Result<()> {
        if self.passes.is_empty() {
            return Err(LabExtractError::Config(
                "at least one scanning pass must be enabled".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(LabExtractError::Config(format!(
                    "start date {start} is after end date {end}"
                )));
            }
        }
        self.date_format_config.validate()
    }
}

/// Helper function to get the thread count from the environment
#[must_use]
pub fn threads_from_env() -> Option<usize> {
    std::env::var(THREADS_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}
