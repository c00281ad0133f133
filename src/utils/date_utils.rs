//! Module for handling collection date parsing and formatting.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::DateFormatConfig;
use crate::error::{LabExtractError, Result};

/// Format used for table column headers
pub const ISO_FORMAT: &str = "%Y-%m-%d";

static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("valid date token pattern"));

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    config
        .date_formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Like [`parse_date_string`], failing with [`LabExtractError::InvalidDate`]
pub fn require_date(s: &str, config: &DateFormatConfig) -> Result<NaiveDate> {
    parse_date_string(s, config).ok_or_else(|| LabExtractError::InvalidDate(s.trim().to_string()))
}

/// Render a date the way the table headers expect it
#[must_use]
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// All `dd/mm/yyyy` tokens in a line, in order of appearance
#[must_use]
pub fn find_date_tokens(line: &str) -> Vec<&str> {
    DATE_TOKEN.find_iter(line).map(|m| m.as_str()).collect()
}
