//! Multi-date panel parser
//!
//! A panel starts at a `Date Collected<TAB>` header listing N collection
//! dates; each following row is `<test>\t<v1>\t...\t<vN>` and the block ends
//! at a blank line. Values line up with dates by position. Repeated panels
//! for the same (test, date) append to the cell instead of replacing it.

use chrono::NaiveDate;
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::config::DateFormatConfig;
use crate::error::{LabExtractError, Result};
use crate::models::{DropReason, PartialTable, ScanStats};
use crate::utils::date_utils::{find_date_tokens, parse_date_string};

/// Literal that opens a panel
pub const PANEL_HEADER: &str = "Date Collected\t";

/// Complete row labels the exporting system truncated to `...Cou`
#[must_use]
pub fn repair_label(label: &str) -> String {
    match label.strip_suffix("Cou") {
        Some(stem) => format!("{stem}Count"),
        None => label.to_string(),
    }
}

/// Parser for tab-delimited panels
#[derive(Debug)]
pub struct PanelParser<'a> {
    allow: &'a FxHashSet<String>,
    formats: DateFormatConfig,
    strict: bool,
}

impl<'a> PanelParser<'a> {
    /// Create a parser keeping only rows named in `allow`
    #[must_use]
    pub fn new(allow: &'a FxHashSet<String>) -> Self {
        Self {
            allow,
            formats: DateFormatConfig::default(),
            strict: true,
        }
    }

    /// Use a different set of collection date formats
    #[must_use]
    pub fn with_date_formats(mut self, formats: DateFormatConfig) -> Self {
        self.formats = formats;
        self
    }

    /// Whether misaligned rows raise an error (default) or are dropped
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse every panel occurrence in `text`
    pub fn parse(&self, text: &str) -> Result<(PartialTable, ScanStats)> {
        let mut table = PartialTable::new();
        let mut stats = ScanStats::default();

        for (index, section) in text.split(PANEL_HEADER).skip(1).enumerate() {
            stats.units_seen += 1;
            let mut lines = section.lines();
            let header = lines.next().unwrap_or_default();

            let Some(dates) = self.header_dates(header) else {
                warn!("Skipping panel {} with unreadable header dates", index + 1);
                stats.record_drop(DropReason::UndiscoverableSectionDate);
                continue;
            };

            let mut seen_row = false;
            for line in lines {
                if line.trim().is_empty() {
                    if seen_row {
                        break;
                    }
                    continue;
                }
                seen_row = true;
                self.parse_row(line, &dates, &mut table, &mut stats)?;
            }
        }

        Ok((table, stats))
    }

    fn header_dates(&self, header: &str) -> Option<Vec<NaiveDate>> {
        let tokens = find_date_tokens(header);
        if tokens.is_empty() {
            return None;
        }
        tokens
            .into_iter()
            .map(|t| parse_date_string(t, &self.formats))
            .collect()
    }

    fn parse_row(
        &self,
        line: &str,
        dates: &[NaiveDate],
        table: &mut PartialTable,
        stats: &mut ScanStats,
    ) -> Result<()> {
        let mut parts = line.trim_end_matches(['\r', '\n', ' ']).split('\t');
        let test = repair_label(parts.next().unwrap_or_default().trim());
        if !self.allow.contains(&test) {
            return Ok(());
        }

        let mut values: Vec<&str> = parts.map(str::trim).collect();
        while values.len() > dates.len() && values.last().is_some_and(|v| v.is_empty()) {
            values.pop();
        }

        if values.len() != dates.len() {
            if self.strict {
                return Err(LabExtractError::PanelAlignmentMismatch {
                    test,
                    dates: dates.len(),
                    values: values.len(),
                });
            }
            warn!(
                "Dropping panel row '{test}': {} values for {} dates",
                values.len(),
                dates.len()
            );
            stats.record_drop(DropReason::MisalignedPanelRow);
            return Ok(());
        }

        for (date, value) in dates.iter().zip(values) {
            if value.is_empty() {
                continue;
            }
            debug!("Panel value for {test} on {date}: {value}");
            table.append(&test, *date, value.to_string());
            stats.observations += 1;
        }
        Ok(())
    }
}
