//! Result shapes of extraction rules

use std::fmt;

/// Structural category of a rule's capture groups and output formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultShape {
    /// One capture: the numeric token with its comparison marker and flag letter
    Numeric,
    /// Two captures (status, value) rendered as `"<label> <status> - <value>"`,
    /// or `"<status> - <value>"` when the rule has no label
    QualitativePair { label: Option<String> },
    /// Captures (status, titre); without a titre only the status is emitted
    TitrePair,
    /// Captures (marker, result); the marker names the row
    MarkerKeyed { unit_suffix: String },
    /// One capture holding a status literal, kept verbatim
    PresenceOnly,
}

impl ResultShape {
    /// Qualitative pair carrying a fixed label such as an immunoglobulin class
    #[must_use]
    pub fn labelled(label: &str) -> Self {
        Self::QualitativePair {
            label: Some(label.to_string()),
        }
    }

    /// Qualitative pair without a label
    #[must_use]
    pub const fn unlabelled() -> Self {
        Self::QualitativePair { label: None }
    }

    /// Marker-keyed shape stripping the given unit from numeric results
    #[must_use]
    pub fn marker_keyed(unit_suffix: &str) -> Self {
        Self::MarkerKeyed {
            unit_suffix: unit_suffix.to_string(),
        }
    }

    /// Minimum number of capture groups a pattern of this shape must define
    #[must_use]
    pub const fn required_groups(&self) -> usize {
        match self {
            Self::Numeric | Self::PresenceOnly | Self::TitrePair => 1,
            Self::QualitativePair { .. } | Self::MarkerKeyed { .. } => 2,
        }
    }

    /// Whether the emitted row name comes from the match rather than the rule
    #[must_use]
    pub const fn names_row_from_match(&self) -> bool {
        matches!(self, Self::MarkerKeyed { .. })
    }

    /// Short tag used in logs
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::QualitativePair { .. } => "QUALITATIVE_PAIR",
            Self::TitrePair => "TITRE_PAIR",
            Self::MarkerKeyed { .. } => "MARKER_KEYED",
            Self::PresenceOnly => "PRESENCE_ONLY",
        }
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
