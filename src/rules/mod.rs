//! Extraction rule catalogues
//!
//! Line rules are matched case-insensitively against single lines under a
//! date context; section rules are matched once per episode with `.`
//! allowed to cross newlines.

pub mod registry;
pub mod section;
pub mod shape;

pub use registry::{ExtractionRule, RuleDef, RuleRegistry, VALUE_PATTERN, standard_rules};
pub use section::{SectionRule, SectionRuleSet, SectionValue};
pub use shape::ResultShape;
