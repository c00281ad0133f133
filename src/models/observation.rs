//! A single extracted result.

use chrono::NaiveDate;

/// One (test, date, value) extraction event produced by a single rule match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Row the value is written to
    pub test_name: String,
    /// Collection date the value belongs to
    pub date: NaiveDate,
    /// Canonical value string
    pub value: String,
}

impl Observation {
    /// Create a new observation
    pub fn new(test_name: impl Into<String>, date: NaiveDate, value: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            date,
            value: value.into(),
        }
    }
}

/// Why an extraction candidate was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A line was seen before any collection date
    MissingDateContext,
    /// An episode carried no parsable collection date
    UndiscoverableSectionDate,
    /// A panel row did not line up with its header (lenient mode only)
    MisalignedPanelRow,
}

/// Counters reported by each scanning pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Non-blank lines or sections visited
    pub units_seen: usize,
    /// Observations written to the partial table
    pub observations: usize,
    /// Rule-matching lines skipped because no date had been seen yet
    pub missing_date_context: usize,
    /// Sections discarded for lack of a date
    pub undiscoverable_section_dates: usize,
    /// Panel rows dropped in lenient mode
    pub misaligned_panel_rows: usize,
    /// Values removed by the collection date window
    pub outside_date_range: usize,
}

impl ScanStats {
    /// Count a discarded candidate
    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingDateContext => self.missing_date_context += 1,
            DropReason::UndiscoverableSectionDate => self.undiscoverable_section_dates += 1,
            DropReason::MisalignedPanelRow => self.misaligned_panel_rows += 1,
        }
    }

    /// Add another pass's counters to this one
    pub fn merge(&mut self, other: &Self) {
        self.units_seen += other.units_seen;
        self.observations += other.observations;
        self.missing_date_context += other.missing_date_context;
        self.undiscoverable_section_dates += other.undiscoverable_section_dates;
        self.misaligned_panel_rows += other.misaligned_panel_rows;
        self.outside_date_range += other.outside_date_range;
    }
}
