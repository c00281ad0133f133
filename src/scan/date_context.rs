//! Line scanner driven by the most recent collection date
//!
//! A two-state machine: before any `Date collected dd/mm/yyyy` line is seen
//! the scanner is in [`DateState::NoDate`] and lines are skipped. A date line
//! moves it to [`DateState::HaveDate`] and is not itself scanned for results.
//! In `HaveDate` every rule is applied to every line and each match is
//! written under the current date, later matches overwriting earlier ones.

use std::sync::LazyLock;

use chrono::NaiveDate;
use log::{debug, warn};
use regex::Regex;

use crate::config::DateFormatConfig;
use crate::models::{DropReason, Observation, PartialTable, ScanStats};
use crate::normalize::normalize_line_match;
use crate::rules::RuleRegistry;
use crate::utils::date_utils::parse_date_string;

/// Collection date declaration; case-sensitive so panel headers never match
static DATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Date\s+collected\s+(\d{2}/\d{2}/\d{4})").expect("valid date line pattern")
});

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateState {
    /// No usable collection date seen yet
    #[default]
    NoDate,
    /// Lines belong to this collection date
    HaveDate(NaiveDate),
}

impl DateState {
    /// The current date, if any
    #[must_use]
    pub const fn date(self) -> Option<NaiveDate> {
        match self {
            Self::NoDate => None,
            Self::HaveDate(date) => Some(date),
        }
    }
}

/// Per-document line scanner
#[derive(Debug)]
pub struct DateContextScanner<'r> {
    registry: &'r RuleRegistry,
    formats: DateFormatConfig,
    state: DateState,
    line_number: usize,
    table: PartialTable,
    stats: ScanStats,
}

impl<'r> DateContextScanner<'r> {
    /// Create a scanner in the `NoDate` state
    #[must_use]
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            formats: DateFormatConfig::default(),
            state: DateState::NoDate,
            line_number: 0,
            table: PartialTable::new(),
            stats: ScanStats::default(),
        }
    }

    /// Use a different set of collection date formats
    #[must_use]
    pub fn with_date_formats(mut self, formats: DateFormatConfig) -> Self {
        self.formats = formats;
        self
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> DateState {
        self.state
    }

    /// Process one line
    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.stats.units_seen += 1;

        if let Some(caps) = DATE_LINE.captures(line) {
            let token = &caps[1];
            self.state = match parse_date_string(token, &self.formats) {
                Some(date) => {
                    debug!("Found date on line {}: {token}", self.line_number);
                    DateState::HaveDate(date)
                }
                None => {
                    warn!(
                        "Ignoring lines after invalid collection date '{token}' on line {}",
                        self.line_number
                    );
                    DateState::NoDate
                }
            };
            return;
        }

        let DateState::HaveDate(date) = self.state else {
            if self.registry.iter().any(|rule| rule.captures_in(line).next().is_some()) {
                self.stats.record_drop(DropReason::MissingDateContext);
            }
            return;
        };

        for rule in self.registry.iter() {
            for caps in rule.captures_in(line) {
                let Some(normalized) = normalize_line_match(rule, &caps) else {
                    continue;
                };
                debug!(
                    "Storing result for {} on {date} (line {}, rule {}): {}",
                    normalized.test_name,
                    self.line_number,
                    rule.key(),
                    normalized.value
                );
                self.table.record(Observation::new(
                    normalized.test_name,
                    date,
                    normalized.value,
                ));
                self.stats.observations += 1;
            }
        }
    }

    /// Process a sequence of lines
    pub fn feed_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
    }

    /// End of input
    #[must_use]
    pub fn finish(self) -> (PartialTable, ScanStats) {
        (self.table, self.stats)
    }
}

/// Scan a whole line sequence with a fresh scanner
#[must_use]
pub fn scan_lines<I, S>(registry: &RuleRegistry, formats: &DateFormatConfig, lines: I) -> (PartialTable, ScanStats)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = DateContextScanner::new(registry).with_date_formats(formats.clone());
    scanner.feed_lines(lines);
    scanner.finish()
}
