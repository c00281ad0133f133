//! Episode-bounded section scanner
//!
//! Report text is split on `Episode <id>` markers. Each section owns the
//! first collection date it declares; sections without one are dropped
//! whole. Every section rule is placeholder-initialised for a newly seen
//! date before the rules run.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::config::DateFormatConfig;
use crate::models::{DropReason, PartialTable, ScanStats};
use crate::normalize::normalize_section_match;
use crate::rules::SectionRuleSet;
use crate::utils::date_utils::parse_date_string;

static EPISODE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Episode\s+\w+").expect("valid episode pattern"));

static SECTION_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Date collected\s+(\d{2}/\d{2}/\d{4})").expect("valid section date pattern")
});

/// Sections of `text`; anything before the first boundary is not a section
pub fn split_episodes(text: &str) -> impl Iterator<Item = &str> {
    EPISODE_BOUNDARY.split(text).skip(1)
}

/// Scanner applying a section rule set to every dated episode
#[derive(Debug)]
pub struct EpisodeScanner<'r> {
    rules: &'r SectionRuleSet,
    formats: DateFormatConfig,
}

impl<'r> EpisodeScanner<'r> {
    /// Create a scanner over the given rule set
    #[must_use]
    pub fn new(rules: &'r SectionRuleSet) -> Self {
        Self {
            rules,
            formats: DateFormatConfig::default(),
        }
    }

    /// Use a different set of collection date formats
    #[must_use]
    pub fn with_date_formats(mut self, formats: DateFormatConfig) -> Self {
        self.formats = formats;
        self
    }

    /// Scan a full document
    #[must_use]
    pub fn scan(&self, text: &str) -> (PartialTable, ScanStats) {
        let mut table = PartialTable::new();
        let mut stats = ScanStats::default();

        for (index, section) in split_episodes(text).enumerate() {
            stats.units_seen += 1;

            let date = SECTION_DATE
                .captures(section)
                .and_then(|caps| parse_date_string(&caps[1], &self.formats));
            let Some(date) = date else {
                warn!("Dropping episode section {} without a collection date", index + 1);
                stats.record_drop(DropReason::UndiscoverableSectionDate);
                continue;
            };

            for test in self.rules.test_names() {
                table.init_placeholder(test, date);
            }

            for rule in self.rules.iter() {
                let Some(caps) = rule.first_match(section) else {
                    continue;
                };
                if let Some(value) = normalize_section_match(rule, &caps) {
                    debug!("Episode {} on {date}: {} = {value}", index + 1, rule.test_name());
                    table.overwrite(rule.test_name(), date, value);
                    stats.observations += 1;
                }
            }
        }

        (table, stats)
    }
}
