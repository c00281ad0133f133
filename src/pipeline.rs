//! Document-level extraction
//!
//! Wires the rule catalogues, the scanning passes and the consolidator
//! together. Every document gets fresh scanner state, so documents can be
//! processed in any order or in parallel.

use std::time::Instant;

use log::{debug, info};

use crate::config::ExtractorConfig;
use crate::consolidate::consolidate_tables;
use crate::error::{LabExtractError, Result};
use crate::models::{PartialTable, ResultTable, ScanStats};
use crate::normalize::collapse_lists;
use crate::rules::{RuleRegistry, SectionRuleSet};
use crate::scan::{EpisodeScanner, PanelParser, scan_lines};

/// Outcome of processing one document
#[derive(Debug, Clone)]
pub struct DocumentResult {
    /// Identifier of the document, usually the file stem
    pub id: String,
    /// Consolidated table
    pub table: ResultTable,
    /// Counters summed over every pass that ran
    pub stats: ScanStats,
}

/// Extraction engine holding the rule catalogues and configuration
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: RuleRegistry,
    sections: SectionRuleSet,
    config: ExtractorConfig,
}

impl Extractor {
    /// Engine with the standard catalogues
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Self::with_rules(RuleRegistry::standard()?, SectionRuleSet::standard()?, config)
    }

    /// Engine with custom catalogues
    pub fn with_rules(
        registry: RuleRegistry,
        sections: SectionRuleSet,
        config: ExtractorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            sections,
            config,
        })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Line rule registry
    #[must_use]
    pub const fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Date-context pass
    pub fn scan_lines<I, S>(&self, lines: I) -> (PartialTable, ScanStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        scan_lines(&self.registry, &self.config.date_format_config, lines)
    }

    /// Episode-context pass
    #[must_use]
    pub fn scan_episodes(&self, text: &str) -> (PartialTable, ScanStats) {
        EpisodeScanner::new(&self.sections)
            .with_date_formats(self.config.date_format_config.clone())
            .scan(text)
    }

    /// Panel pass; single-element cells are collapsed to scalars
    pub fn scan_panels(&self, text: &str) -> Result<(PartialTable, ScanStats)> {
        let (table, stats) = PanelParser::new(&self.config.panel_tests)
            .with_date_formats(self.config.date_format_config.clone())
            .strict(self.config.strict_panel_alignment)
            .parse(text)?;
        Ok((collapse_lists(table), stats))
    }

    /// Run the configured passes over one document and consolidate them
    ///
    /// Partial tables are merged in the order line scan, panels, episodes.
    /// Fails with [`LabExtractError::EmptyExtraction`] when no pass produced
    /// a real value.
    pub fn process_document(&self, id: &str, text: &str) -> Result<DocumentResult> {
        let start = Instant::now();
        let passes = self.config.passes;
        let mut partials = Vec::with_capacity(3);
        let mut stats = ScanStats::default();

        if passes.line_scan {
            let (table, pass_stats) = self.scan_lines(text.lines());
            debug!("{id}: line scan stored {} observations", pass_stats.observations);
            stats.merge(&pass_stats);
            partials.push(table);
        }
        if passes.panel_scan {
            let (table, pass_stats) = self.scan_panels(text)?;
            debug!("{id}: panel scan stored {} observations", pass_stats.observations);
            stats.merge(&pass_stats);
            partials.push(table);
        }
        if passes.episode_scan {
            let (table, pass_stats) = self.scan_episodes(text);
            debug!("{id}: episode scan stored {} observations", pass_stats.observations);
            stats.merge(&pass_stats);
            partials.push(table);
        }

        for table in &mut partials {
            stats.outside_date_range +=
                table.retain_dates(|date| self.config.is_date_in_range(date));
        }

        if partials.iter().all(|t| t.observation_count() == 0) {
            return Err(LabExtractError::EmptyExtraction {
                document: id.to_string(),
            });
        }

        let table = consolidate_tables(partials);
        info!(
            "{id}: {} tests over {} dates in {:?}",
            table.tests().len(),
            table.dates().len(),
            start.elapsed()
        );

        Ok(DocumentResult {
            id: id.to_string(),
            table,
            stats,
        })
    }
}

/// Date-context extraction over a line sequence with the standard catalogue
#[must_use]
pub fn extract<I, S>(lines: I) -> ResultTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (table, _) = scan_lines(
        RuleRegistry::standard_ref(),
        &ExtractorConfig::default().date_format_config,
        lines,
    );
    consolidate_tables([table])
}

/// [`extract`] over a text blob
#[must_use]
pub fn extract_text(text: &str) -> ResultTable {
    extract(text.lines())
}

/// Panel and episode extraction over a text blob with the standard catalogue
pub fn consolidate(text: &str) -> Result<ResultTable> {
    let config = ExtractorConfig::default();
    let (panels, _) = PanelParser::new(&config.panel_tests)
        .strict(config.strict_panel_alignment)
        .parse(text)?;
    let (episodes, _) = EpisodeScanner::new(SectionRuleSet::standard_ref()).scan(text);
    Ok(consolidate_tables([collapse_lists(panels), episodes]))
}
