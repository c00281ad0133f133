//! Consolidation of partial tables into one dense result table
//!
//! Dates are gathered from every row of every input, sorted by calendar
//! value and used as columns. Rows keep the order in which tests were first
//! seen. Cells without an observation hold the placeholder. Differently
//! spelled test names stay separate rows.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;

use crate::models::{CellValue, PartialTable, ResultTable};

/// Merge partial tables in the order given
///
/// When two tables hold the same (test, date) cell, a later real value
/// replaces an earlier one; a placeholder never replaces a real value.
#[must_use]
pub fn consolidate_tables<I>(tables: I) -> ResultTable
where
    I: IntoIterator<Item = PartialTable>,
{
    let mut order: Vec<String> = Vec::new();
    let mut merged: FxHashMap<String, BTreeMap<NaiveDate, CellValue>> = FxHashMap::default();

    for table in tables {
        for (test, row) in table.rows() {
            let target = merged.entry(test.to_string()).or_insert_with(|| {
                order.push(test.to_string());
                BTreeMap::new()
            });
            for (date, cell) in row {
                merge_cell(target.entry(*date).or_default(), cell);
            }
        }
    }

    let dates: Vec<NaiveDate> = merged
        .values()
        .flat_map(BTreeMap::keys)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let cells = order
        .iter()
        .map(|test| {
            let row = &merged[test];
            dates
                .iter()
                .map(|date| row.get(date).cloned().unwrap_or_default().collapse())
                .collect_vec()
        })
        .collect_vec();

    let index = order
        .iter()
        .enumerate()
        .map(|(i, test)| (test.clone(), i))
        .collect();

    debug!(
        "Consolidated {} tests over {} dates",
        order.len(),
        dates.len()
    );

    ResultTable {
        dates,
        tests: order,
        cells,
        index,
    }
}

fn merge_cell(target: &mut CellValue, incoming: &CellValue) {
    if !incoming.is_missing() {
        *target = incoming.clone();
    }
}

/// Consolidate a single partial table
#[must_use]
pub fn consolidate_one(table: PartialTable) -> ResultTable {
    consolidate_tables(std::iter::once(table))
}
