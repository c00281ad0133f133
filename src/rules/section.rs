//! Rules evaluated once per episode section

use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};

use crate::error::{LabExtractError, Result};

/// How a section rule's captures become a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionValue {
    /// One group gives the value, two give `"<group1> - <group2>"`
    Auto,
    /// Only the first group, trimmed, however many groups the pattern has
    FirstGroup,
}

/// A per-section rule
#[derive(Debug, Clone)]
pub struct SectionRule {
    test_name: String,
    pattern: Regex,
    value: SectionValue,
}

impl SectionRule {
    /// Compile a section rule; `.` crosses newlines, matching is case-sensitive
    pub fn new(test_name: &str, pattern: &str, value: SectionValue) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| LabExtractError::InvalidPattern {
                key: test_name.to_string(),
                source,
            })?;
        if pattern.captures_len() < 2 {
            return Err(LabExtractError::Config(format!(
                "section rule '{test_name}' has no capture group"
            )));
        }
        Ok(Self {
            test_name: test_name.to_string(),
            pattern,
            value,
        })
    }

    /// Row written by this rule
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Value mode
    #[must_use]
    pub const fn value_mode(&self) -> SectionValue {
        self.value
    }

    /// First match inside a section
    #[must_use]
    pub fn first_match<'t>(&self, section: &'t str) -> Option<Captures<'t>> {
        self.pattern.captures(section)
    }
}

/// Fixed dictionary of section rules, in evaluation order
#[derive(Debug, Clone)]
pub struct SectionRuleSet {
    rules: Vec<SectionRule>,
}

impl SectionRuleSet {
    /// Build a set from compiled rules
    #[must_use]
    pub fn new(rules: Vec<SectionRule>) -> Self {
        Self { rules }
    }

    /// The standard chemistry, histopathology and coagulation dictionary
    pub fn standard() -> Result<Self> {
        use SectionValue::{Auto, FirstGroup};

        let rules = vec![
            SectionRule::new("Urine protein", r"Urine protein\s+([\d.]+)?\s*g/L", Auto)?,
            SectionRule::new(
                "Urine protein creat ratio",
                r"Urine protein\s+creat ratio\s+([\d.]+)?\s*H?\s*g/mmol creat",
                Auto,
            )?,
            SectionRule::new("Creatinine", r"Creatinine\s+(\d+)\s*L?\s*umol/L", Auto)?,
            SectionRule::new("Sodium", r"Sodium\s+(\d+)\s*mmol/L", Auto)?,
            SectionRule::new("Urea", r"Urea\s+([\d.]+)\s+mmol/L", Auto)?,
            SectionRule::new("Calcium", r"Calcium\s+([\d.]+)\s+mmol/L", Auto)?,
            SectionRule::new("Histopathology", r"CLINICAL:(.*?)PATHOLOGIST:", FirstGroup)?,
            SectionRule::new(
                "LA",
                r"Lupus Anticoagulant:.*?Normalised LAC Ratio\s+([\d.]+\s*[A-Za-z]?)",
                FirstGroup,
            )?,
        ];
        Ok(Self::new(rules))
    }

    /// Shared compiled copy of [`SectionRuleSet::standard`]
    #[must_use]
    pub fn standard_ref() -> &'static Self {
        &STANDARD
    }

    /// Rules in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &SectionRule> {
        self.rules.iter()
    }

    /// Row names of every rule
    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(SectionRule::test_name)
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static STANDARD: LazyLock<SectionRuleSet> =
    LazyLock::new(|| SectionRuleSet::standard().expect("standard section rules compile"));
