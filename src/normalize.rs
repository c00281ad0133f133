//! Result shape normalisation
//!
//! Turns raw regex captures into canonical value strings. Line rules are
//! dispatched on their [`ResultShape`], section rules on their
//! [`SectionValue`] mode, and panel cells are collapsed from lists.

use regex::Captures;

use crate::models::PartialTable;
use crate::rules::{ExtractionRule, ResultShape, SectionRule, SectionValue};

/// Status literals kept verbatim by marker-keyed rules
pub const QUALITATIVE_LITERALS: [&str; 2] = ["Positive", "Negative"];

/// A normalised line match: the row to write and its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub test_name: String,
    pub value: String,
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str())
}

/// Normalise one match of a line rule
///
/// Returns `None` when a capture required by the shape did not participate.
#[must_use]
pub fn normalize_line_match(rule: &ExtractionRule, caps: &Captures<'_>) -> Option<Normalized> {
    let mut test_name = rule.test_name().to_string();

    let value = match rule.shape() {
        ResultShape::Numeric | ResultShape::PresenceOnly => group(caps, 1)?.trim().to_string(),
        ResultShape::QualitativePair { label } => {
            let status = group(caps, 1)?.trim();
            let value = group(caps, 2)?.trim();
            match label {
                Some(label) => format!("{label} {status} - {value}"),
                None => format!("{status} - {value}"),
            }
        }
        ResultShape::TitrePair => {
            let status = group(caps, 1)?.trim();
            match group(caps, 2) {
                Some(titre) => format!("{status} - {}", titre.trim()),
                None => status.to_string(),
            }
        }
        ResultShape::MarkerKeyed { unit_suffix } => {
            test_name = group(caps, 1)?.trim().to_string();
            normalize_marker_result(group(caps, 2)?, unit_suffix)
        }
    };

    Some(Normalized { test_name, value })
}

/// Keep qualitative literals, otherwise strip the unit and trim
#[must_use]
pub fn normalize_marker_result(raw: &str, unit_suffix: &str) -> String {
    let raw = raw.trim();
    if QUALITATIVE_LITERALS
        .iter()
        .any(|lit| raw.eq_ignore_ascii_case(lit))
    {
        return raw.to_string();
    }
    strip_suffix_ignore_case(raw, unit_suffix).trim().to_string()
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() || s.len() < suffix.len() {
        return s;
    }
    let split = s.len() - suffix.len();
    match (s.get(..split), s.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head,
        _ => s,
    }
}

/// Normalise the first match of a section rule
///
/// Returns `None` when the value group did not participate, leaving the
/// placeholder in place.
#[must_use]
pub fn normalize_section_match(rule: &SectionRule, caps: &Captures<'_>) -> Option<String> {
    let first = group(caps, 1);
    match rule.value_mode() {
        SectionValue::FirstGroup => first.map(|v| v.trim().to_string()),
        SectionValue::Auto if caps.len() > 2 => match (first, group(caps, 2)) {
            (Some(a), Some(b)) => Some(format!("{a} - {b}")),
            (Some(a), None) => Some(a.to_string()),
            (None, Some(b)) => Some(b.to_string()),
            (None, None) => None,
        },
        SectionValue::Auto => first.map(str::to_string),
    }
}

/// Collapse single-element list cells to scalars across a whole table
#[must_use]
pub fn collapse_lists(table: PartialTable) -> PartialTable {
    let mut collapsed = PartialTable::new();
    for (test, row) in table.rows() {
        for (date, cell) in row {
            collapsed.set(test, *date, cell.clone().collapse());
        }
    }
    collapsed
}
