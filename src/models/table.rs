//! Partial and consolidated result tables.
//!
//! Every scanning pass writes into a [`PartialTable`]: rows keyed by test
//! name in first-seen order, each row a date-ordered map of cells. The
//! consolidator turns one or more partial tables into a dense
//! [`ResultTable`] in which every test has a cell for every date.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use super::observation::Observation;
use crate::utils::date_utils::to_iso;

/// Marker rendered for a cell with no result
pub const PLACEHOLDER: &str = "-";

/// Separator used when a multi-valued cell is rendered as one string
pub const MULTI_SEPARATOR: &str = "; ";

/// Content of one (test, date) cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    /// No result for this date
    #[default]
    Missing,
    /// A single canonical value
    Value(String),
    /// Several values gathered from repeated panels, in order of appearance
    Multi(SmallVec<[String; 2]>),
}

impl CellValue {
    /// Whether the cell is the placeholder
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The scalar value, if the cell holds exactly one
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// All values held by the cell
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Missing => &[],
            Self::Value(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        }
    }

    /// Append a value, promoting the cell to a list when it already holds one
    pub fn push(&mut self, value: String) {
        match self {
            Self::Missing => *self = Self::Value(value),
            Self::Value(existing) => {
                let first = std::mem::take(existing);
                let mut values = SmallVec::new();
                values.push(first);
                values.push(value);
                *self = Self::Multi(values);
            }
            Self::Multi(values) => values.push(value),
        }
    }

    /// Reduce a one-element list to its scalar
    #[must_use]
    pub fn collapse(self) -> Self {
        match self {
            Self::Multi(mut values) if values.len() == 1 => Self::Value(values.remove(0)),
            Self::Multi(values) if values.is_empty() => Self::Missing,
            other => other,
        }
    }

    /// Render the cell for a flat text output
    #[must_use]
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Missing => Cow::Borrowed(PLACEHOLDER),
            Self::Value(v) => Cow::Borrowed(v),
            Self::Multi(values) => Cow::Owned(values.join(MULTI_SEPARATOR)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing => serializer.serialize_str(PLACEHOLDER),
            Self::Value(v) => serializer.serialize_str(v),
            Self::Multi(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
        }
    }
}

/// Sparse, per-pass table of extracted cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialTable {
    order: Vec<String>,
    rows: FxHashMap<String, BTreeMap<NaiveDate, CellValue>>,
}

impl PartialTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn row_mut(&mut self, test: &str) -> &mut BTreeMap<NaiveDate, CellValue> {
        if !self.rows.contains_key(test) {
            self.order.push(test.to_string());
        }
        self.rows.entry(test.to_string()).or_default()
    }

    /// Write an observation, replacing whatever the cell held
    pub fn record(&mut self, observation: Observation) {
        let Observation {
            test_name,
            date,
            value,
        } = observation;
        self.overwrite(&test_name, date, value);
    }

    /// Write a value, replacing whatever the cell held
    pub fn overwrite(&mut self, test: &str, date: NaiveDate, value: String) {
        self.row_mut(test).insert(date, CellValue::Value(value));
    }

    /// Add a value to the cell, keeping earlier values
    pub fn append(&mut self, test: &str, date: NaiveDate, value: String) {
        self.row_mut(test).entry(date).or_default().push(value);
    }

    /// Put the placeholder into a cell that has no entry yet
    pub fn init_placeholder(&mut self, test: &str, date: NaiveDate) {
        self.row_mut(test).entry(date).or_default();
    }

    /// Write a cell as-is
    pub fn set(&mut self, test: &str, date: NaiveDate, cell: CellValue) {
        self.row_mut(test).insert(date, cell);
    }

    /// Look up a cell
    #[must_use]
    pub fn get(&self, test: &str, date: NaiveDate) -> Option<&CellValue> {
        self.rows.get(test).and_then(|row| row.get(&date))
    }

    /// Test names in first-seen order
    pub fn tests(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Rows in first-seen order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<NaiveDate, CellValue>)> {
        self.order
            .iter()
            .filter_map(|t| self.rows.get(t).map(|row| (t.as_str(), row)))
    }

    /// Whether no row exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of cells holding at least one real value
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.rows
            .values()
            .flat_map(BTreeMap::values)
            .filter(|cell| !cell.is_missing())
            .count()
    }

    /// Remove every cell whose date fails the predicate; rows left empty are removed
    ///
    /// Returns the number of real values removed.
    pub fn retain_dates<F: Fn(&NaiveDate) -> bool>(&mut self, keep: F) -> usize {
        let mut removed = 0;
        for row in self.rows.values_mut() {
            row.retain(|date, cell| {
                let kept = keep(date);
                if !kept && !cell.is_missing() {
                    removed += 1;
                }
                kept
            });
        }
        let rows = &self.rows;
        self.order
            .retain(|t| rows.get(t).is_some_and(|row| !row.is_empty()));
        let order = &self.order;
        self.rows.retain(|t, _| order.contains(t));
        removed
    }
}

/// Dense table ready for rendering
///
/// Rows are test names in first-seen order, columns are dates in ascending
/// calendar order, and every cell is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) tests: Vec<String>,
    pub(crate) cells: Vec<Vec<CellValue>>,
    pub(crate) index: FxHashMap<String, usize>,
}

impl ResultTable {
    /// Column dates, ascending
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column headers as `YYYY-MM-DD`
    #[must_use]
    pub fn iso_dates(&self) -> Vec<String> {
        self.dates.iter().copied().map(to_iso).collect()
    }

    /// Row names
    #[must_use]
    pub fn tests(&self) -> &[String] {
        &self.tests
    }

    /// Look up a cell
    #[must_use]
    pub fn get(&self, test: &str, date: NaiveDate) -> Option<&CellValue> {
        let row = *self.index.get(test)?;
        let col = self.dates.binary_search(&date).ok()?;
        self.cells.get(row).and_then(|cells| cells.get(col))
    }

    /// Cells of one row, aligned with [`Self::dates`]
    #[must_use]
    pub fn row(&self, test: &str) -> Option<&[CellValue]> {
        self.index.get(test).map(|&row| self.cells[row].as_slice())
    }

    /// Rows in order with their cells
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[CellValue])> {
        self.tests
            .iter()
            .zip(&self.cells)
            .map(|(t, cells)| (t.as_str(), cells.as_slice()))
    }

    /// Whether the table has no rows or no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() || self.dates.is_empty()
    }

    /// Number of cells holding a real value
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_missing())
            .count()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Row<'a> {
            dates: &'a [String],
            cells: &'a [CellValue],
        }

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.dates.len()))?;
                for (date, cell) in self.dates.iter().zip(self.cells) {
                    map.serialize_entry(date, cell)?;
                }
                map.end()
            }
        }

        let dates = self.iso_dates();
        let mut map = serializer.serialize_map(Some(self.tests.len()))?;
        for (test, cells) in self.rows() {
            map.serialize_entry(
                test,
                &Row {
                    dates: &dates,
                    cells,
                },
            )?;
        }
        map.end()
    }
}
