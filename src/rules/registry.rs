//! Line rule registry
//!
//! The catalogue is plain data: each entry names a test, a pattern and a
//! [`ResultShape`]. Adding a test means adding an entry; the normaliser
//! dispatches on the shape alone.

use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};
use rustc_hash::FxHashMap;

use super::shape::ResultShape;
use crate::error::{LabExtractError, Result};

/// Numeric result token: optional `<`/`>` marker, digits, optional H/L flag
pub const VALUE_PATTERN: &str = r"(<?>?[\d.]+(?:\s*[HL])?)";

/// Token in a rule pattern replaced by [`VALUE_PATTERN`]
pub const VALUE_TOKEN: &str = "{value}";

/// Declarative description of a line rule
#[derive(Debug, Clone)]
pub struct RuleDef {
    /// Unique identifier within the registry
    pub key: String,
    /// Row written by matches (ignored for marker-keyed rules)
    pub test_name: String,
    /// Pattern, possibly containing [`VALUE_TOKEN`]
    pub pattern: String,
    /// How captures are turned into a value
    pub shape: ResultShape,
    /// Matches followed by text matching this pattern are discarded
    pub reject_if_followed_by: Option<String>,
}

impl RuleDef {
    /// Rule whose key is also its row name
    pub fn new(key: &str, pattern: &str, shape: ResultShape) -> Self {
        Self {
            key: key.to_string(),
            test_name: key.to_string(),
            pattern: pattern.to_string(),
            shape,
            reject_if_followed_by: None,
        }
    }

    /// Numeric rule
    pub fn numeric(key: &str, pattern: &str) -> Self {
        Self::new(key, pattern, ResultShape::Numeric)
    }

    /// Write matches to a row other than the key
    #[must_use]
    pub fn emitting(mut self, test_name: &str) -> Self {
        self.test_name = test_name.to_string();
        self
    }

    /// Discard matches followed by the given pattern
    #[must_use]
    pub fn rejecting_followed_by(mut self, pattern: &str) -> Self {
        self.reject_if_followed_by = Some(pattern.to_string());
        self
    }
}

/// Compiled, immutable rule
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    key: String,
    test_name: String,
    shape: ResultShape,
    pattern: Regex,
    reject_if_followed_by: Option<Regex>,
}

impl ExtractionRule {
    /// Compile a rule definition
    ///
    /// Patterns are case-insensitive and `.` crosses line boundaries.
    pub fn compile(def: &RuleDef) -> Result<Self> {
        let source = def.pattern.replace(VALUE_TOKEN, VALUE_PATTERN);
        let pattern = build_pattern(&def.key, &source)?;

        let groups = pattern.captures_len() - 1;
        if groups < def.shape.required_groups() {
            return Err(LabExtractError::Config(format!(
                "rule '{}' of shape {} needs {} capture groups, pattern has {groups}",
                def.key,
                def.shape,
                def.shape.required_groups()
            )));
        }

        let reject_if_followed_by = def
            .reject_if_followed_by
            .as_deref()
            .map(|guard| build_pattern(&def.key, guard))
            .transpose()?;

        Ok(Self {
            key: def.key.clone(),
            test_name: def.test_name.clone(),
            shape: def.shape.clone(),
            pattern,
            reject_if_followed_by,
        })
    }

    /// Registry key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Row written by matches of this rule
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Result shape
    #[must_use]
    pub const fn shape(&self) -> &ResultShape {
        &self.shape
    }

    /// Every accepted match in `text`, left to right
    pub fn captures_in<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = Captures<'t>> + 'r
    where
        't: 'r,
    {
        self.pattern
            .captures_iter(text)
            .filter_map(move |caps| self.accept(text, caps))
    }

    /// Apply the follow-on guard to a match
    ///
    /// A rejected single-group match falls through to later occurrences of
    /// the same word, the first one the guard lets through is used instead.
    fn accept<'t>(&self, text: &'t str, caps: Captures<'t>) -> Option<Captures<'t>> {
        let Some(guard) = &self.reject_if_followed_by else {
            return Some(caps);
        };
        let whole = caps.get(0)?;
        if !guard.is_match(&text[whole.end()..]) {
            return Some(caps);
        }
        if caps.len() != 2 {
            return None;
        }

        let word = caps.get(1)?;
        let retry = RegexBuilder::new(&format!(r"\b({})\b", regex::escape(word.as_str())))
            .case_insensitive(true)
            .build()
            .ok()?;
        let mut pos = word.end();
        while let Some(next) = retry.captures_at(text, pos) {
            let end = next.get(0)?.end();
            if !guard.is_match(&text[end..]) {
                return Some(next);
            }
            pos = end;
        }
        None
    }
}

fn build_pattern(key: &str, source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| LabExtractError::InvalidPattern {
            key: key.to_string(),
            source,
        })
}

/// Ordered catalogue of compiled rules
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<ExtractionRule>,
    by_key: FxHashMap<String, usize>,
}

impl RuleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a list of definitions, keeping their order
    pub fn from_defs<I: IntoIterator<Item = RuleDef>>(defs: I) -> Result<Self> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(&def)?;
        }
        Ok(registry)
    }

    /// Registry holding the standard catalogue
    pub fn standard() -> Result<Self> {
        Self::from_defs(standard_rules())
    }

    /// Shared instance of the standard catalogue
    #[must_use]
    pub fn standard_ref() -> &'static Self {
        &STANDARD
    }

    /// Compile and append a rule; keys must be unique
    pub fn register(&mut self, def: &RuleDef) -> Result<()> {
        if self.by_key.contains_key(&def.key) {
            return Err(LabExtractError::Config(format!(
                "duplicate rule key '{}'",
                def.key
            )));
        }
        let rule = ExtractionRule::compile(def)?;
        self.by_key.insert(def.key.clone(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Rule descriptor for a key
    pub fn get(&self, key: &str) -> Result<&ExtractionRule> {
        self.by_key
            .get(key)
            .map(|&i| &self.rules[i])
            .ok_or_else(|| LabExtractError::UnknownRule(key.to_string()))
    }

    /// Rules in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &ExtractionRule> {
        self.rules.iter()
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry holds no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static STANDARD: LazyLock<RuleRegistry> =
    LazyLock::new(|| RuleRegistry::standard().expect("standard rule catalogue compiles"));

/// The standard line rule catalogue
#[must_use]
pub fn standard_rules() -> Vec<RuleDef> {
    vec![
        RuleDef::numeric("Blood Creatinine", r"Creatinine\s+{value}\s+(?:mmol/L|umol/L)"),
        RuleDef::numeric("Urine Creatinine", r"Urine\s+creatinine\s+{value}\s+mmol/L"),
        RuleDef::numeric("Calcium", r"Calcium\s+{value}\s+mmol/L"),
        RuleDef::numeric("Urea", r"Urea\s+{value}\s+mmol/L"),
        RuleDef::numeric("Sodium", r"Sodium\s+{value}\s+mmol/L"),
        RuleDef::numeric("ESR", r"ESR\s+{value}\s+mm/hr"),
        RuleDef::numeric("CRP", r"C-Reactive\s+protein\s+{value}\s+mg/L"),
        RuleDef::numeric("ALP", r"Alkaline phosphatase\s*\(ALP\)\s+{value}\s+U/L"),
        RuleDef::numeric("GGT", r"Gamma-glutamyl transferase\s*\(GGT\)\s+{value}\s+U/L"),
        RuleDef::numeric("AST", r"Aspartate transaminase\s*\(AST\)\s+{value}\s+U/L"),
        RuleDef::numeric("ALT", r"Alanine transaminase\s*\(ALT\)\s+{value}\s+U/L"),
        RuleDef::numeric("Complement C3", r"Complement\s+C3\s+{value}\s+g/L"),
        RuleDef::numeric("Complement C4", r"Complement\s+C4\s+{value}\s+g/L"),
        RuleDef::new(
            "AB2GPEL IgG",
            r"Anti-beta\s*2\s*glycoprotein-1\s*antibody.*?IgG\s+result\s+(Positive|Negative)\s+Value\s+([\d.]+)",
            ResultShape::labelled("IgG"),
        ),
        RuleDef::new(
            "AB2GPEL IgM",
            r"Anti-beta\s*2\s*glycoprotein-1\s*antibody.*?IgM\s+Result\s+(Positive|Negative)\s+Value\s+([\d.]+)",
            ResultShape::labelled("IgM"),
        ),
        RuleDef::new(
            "ADNAEL",
            r"Anti-double\s+stranded\s+DNA\s+antibody.*?IgG\s+Result\s+(Positive|Negative)\s+Value\s+([\d.]+)",
            ResultShape::labelled("IgG"),
        ),
        RuleDef::new(
            "ANAIF_Positive",
            r"Anti-nuclear\s+antibodies.*?\b(Positive)\s+Titre\s+([\d.]+)",
            ResultShape::TitrePair,
        )
        .emitting("ANAIF"),
        RuleDef::new(
            "ANAIF_Negative",
            r"Anti-nuclear\s+antibodies.*?\b(Negative)",
            ResultShape::TitrePair,
        )
        .emitting("ANAIF")
        .rejecting_followed_by("Titre"),
        RuleDef::numeric("Cholesterol", r"Cholesterol\s+{value}\s+mmol/L"),
        RuleDef::numeric("HbA1c", r"HbA1c\s+{value}\s*%"),
        RuleDef::numeric("TSH", r"TSH\s+{value}\s+mIU/L"),
        RuleDef::numeric("eGFR", r"eGFR\s+{value}\s+mL/min/1\.73\s*m2"),
        RuleDef::numeric("MCV", r"MCV\s+{value}\s+fL"),
        RuleDef::numeric("Hb", r"\bHb\b\s+{value}\s+g/L"),
        RuleDef::new(
            "HIV Serology",
            r"HIV\s+(?:antibody\s+test:|status:)\s+(Positive|Negative)",
            ResultShape::PresenceOnly,
        ),
        RuleDef::numeric("HIV Viral Load", r"HIV\s+Viral\s+Load\s+(<?>?[\d.]+)\s+copies/mL"),
        RuleDef::new(
            "ACCP",
            r"Anti-CCP\s+antibod(?:y|ies).*?(Positive|Negative)\s+Value\s+([\d.]+)\s+U/mL",
            ResultShape::unlabelled(),
        ),
        RuleDef::new(
            "Hep B",
            r"(HBsAg|Anti-HBs|Anti-HBc(?:\s+IgM)?|HBeAg|Anti-HBe)\s*:\s*(Positive|Negative|<?>?[\d.]+(?:\s*[HL])?\s*(?:IU/mL)?)",
            ResultShape::marker_keyed("IU/mL"),
        ),
        RuleDef::numeric("RF", r"Rheumatoid\s+factor\s*\(RF\)\s+{value}\s+IU/mL"),
    ]
}
